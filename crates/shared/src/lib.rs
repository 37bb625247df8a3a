pub mod aggregation;
pub mod config;
pub mod llm;
pub mod models;
pub mod repos;
pub mod timewindow;
