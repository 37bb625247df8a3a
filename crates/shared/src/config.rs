use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_IMAGE_VARIANTS: &[&str] = &[
    "gemini-flash-latest",
    "gemini-2.0-flash-lite-001",
    "gemini-2.0-flash",
];

const DEFAULT_CHAT_VARIANTS: &[&str] = &[
    "gemini-2.0-flash-lite-001",
    "gemini-2.0-flash",
    "gemini-flash-latest",
];

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub migrations_dir: PathBuf,
    pub image_variants: Vec<String>,
    pub chat_variants: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env::var("API_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_u32_env("DATABASE_MAX_CONNECTIONS", 10)?,
            migrations_dir: env::var("MIGRATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../db/migrations")
                }),
            image_variants: parse_variants_env("INFERENCE_IMAGE_VARIANTS", DEFAULT_IMAGE_VARIANTS),
            chat_variants: parse_variants_env("INFERENCE_CHAT_VARIANTS", DEFAULT_CHAT_VARIANTS),
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))
}

fn parse_u32_env(key: &str, default: u32) -> Result<u32, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|_| ConfigError::ParseInt(key.to_string())),
        Err(_) => Ok(default),
    }
}

fn parse_variants_env(key: &str, default: &[&str]) -> Vec<String> {
    let parsed = env::var(key)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|variant| !variant.is_empty())
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if parsed.is_empty() {
        return default.iter().map(ToString::to_string).collect();
    }

    parsed
}
