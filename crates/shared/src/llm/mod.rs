pub mod cascade;
pub mod fallback;
pub mod gateway;
pub mod gemini;
pub mod prompts;
pub mod recognition;

pub use cascade::{CascadeError, CascadeSuccess, ModelCascade, VariantFailure};
pub use gateway::{ChatTurn, InferenceError, InferenceFuture, InferenceGateway, InferenceRequest};
pub use gemini::{GeminiConfigError, GeminiGateway, GeminiGatewayConfig};
pub use recognition::{RecognitionResult, RecognizedFood, parse_recognition};
