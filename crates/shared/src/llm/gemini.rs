use std::env;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use super::gateway::{InferenceError, InferenceFuture, InferenceGateway, InferenceRequest};
use crate::models::MessageRole;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_MS: u64 = 20_000;
const IMAGE_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone)]
pub struct GeminiGatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl GeminiGatewayConfig {
    pub fn from_env() -> Result<Self, GeminiConfigError> {
        let api_key = require_non_empty_env("GEMINI_API_KEY")?;
        let base_url = optional_trimmed_env("GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(GeminiConfigError::InvalidConfiguration(
                "GEMINI_BASE_URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_ms: parse_u64_env("GEMINI_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?,
        })
    }
}

#[derive(Debug, Error)]
pub enum GeminiConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {key}: {value}")]
    ParseInt { key: String, value: String },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build gemini http client: {0}")]
    HttpClient(String),
}

#[derive(Clone)]
pub struct GeminiGateway {
    client: reqwest::Client,
    config: GeminiGatewayConfig,
}

impl GeminiGateway {
    pub fn new(config: GeminiGatewayConfig) -> Result<Self, GeminiConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| GeminiConfigError::HttpClient(err.to_string()))?;

        Ok(Self { client, config })
    }

    async fn send_once(
        &self,
        variant: &str,
        request: &InferenceRequest,
    ) -> Result<String, InferenceError> {
        let url = format!(
            "{}/models/{variant}:generateContent",
            self.config.base_url
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    InferenceError::Timeout
                } else {
                    InferenceError::ProviderFailure("request_unavailable".to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|_| {
            InferenceError::InvalidProviderPayload("response_body_read_failed".to_string())
        })?;

        if !status.is_success() {
            let provider_code = parse_provider_error_code(&body);
            return Err(InferenceError::ProviderFailure(format!(
                "status={} code={provider_code}",
                status.as_u16()
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|_| {
            InferenceError::InvalidProviderPayload("response_json_parse_failed".to_string())
        })?;

        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
            InferenceError::InvalidProviderPayload("missing_candidate".to_string())
        })?;

        let text = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(InferenceError::EmptyOutput);
        }

        Ok(text)
    }
}

impl InferenceGateway for GeminiGateway {
    // One send per attempt: the cascade falls through to the next variant on
    // failure instead of retrying the same one.
    fn call<'a>(&'a self, variant: &'a str, request: &'a InferenceRequest) -> InferenceFuture<'a> {
        Box::pin(self.send_once(variant, request))
    }
}

fn request_body(request: &InferenceRequest) -> Value {
    match request {
        InferenceRequest::ImageAnalysis { instruction, image } => json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": instruction },
                    {
                        "inline_data": {
                            "mime_type": IMAGE_MIME_TYPE,
                            "data": strip_data_url_prefix(image),
                        }
                    }
                ]
            }]
        }),
        InferenceRequest::Chat {
            system_persona,
            history,
            new_message,
        } => {
            let mut contents = history
                .iter()
                .map(|turn| {
                    json!({
                        "role": provider_role(turn.role),
                        "parts": [{ "text": turn.content }]
                    })
                })
                .collect::<Vec<_>>();
            contents.push(json!({
                "role": "user",
                "parts": [{ "text": new_message }]
            }));

            json!({
                "system_instruction": { "parts": [{ "text": system_persona }] },
                "contents": contents,
            })
        }
    }
}

fn provider_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    }
}

/// Clients may submit the raw canvas export, e.g.
/// `data:image/jpeg;base64,<payload>`; the provider wants only the payload.
pub fn strip_data_url_prefix(image: &str) -> &str {
    let trimmed = image.trim();
    if !trimmed.starts_with("data:image/") {
        return trimmed;
    }

    match trimmed.split_once(";base64,") {
        Some((_, payload)) => payload,
        None => trimmed,
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GenerateContentCandidate>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentCandidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn parse_provider_error_code(body: &str) -> String {
    #[derive(Deserialize)]
    struct ProviderErrorEnvelope {
        error: Option<ProviderErrorDetails>,
    }

    #[derive(Deserialize)]
    struct ProviderErrorDetails {
        status: Option<String>,
        code: Option<Value>,
    }

    let parsed = serde_json::from_str::<ProviderErrorEnvelope>(body).ok();
    let Some(details) = parsed.and_then(|envelope| envelope.error) else {
        return "unknown".to_string();
    };

    if let Some(status) = details.status.filter(|status| !status.is_empty()) {
        return status;
    }

    match details.code {
        Some(Value::String(code)) => code,
        Some(Value::Number(code)) => code.to_string(),
        _ => "unknown".to_string(),
    }
}

fn require_non_empty_env(key: &str) -> Result<String, GeminiConfigError> {
    let value = env::var(key).map_err(|_| GeminiConfigError::MissingVar(key.to_string()))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GeminiConfigError::MissingVar(key.to_string()));
    }
    Ok(trimmed.to_string())
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64, GeminiConfigError> {
    match optional_trimmed_env(key) {
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| GeminiConfigError::ParseInt {
                key: key.to_string(),
                value,
            }),
        None => Ok(default),
    }
}

fn optional_trimmed_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_provider_error_code, request_body, strip_data_url_prefix};
    use crate::llm::gateway::{ChatTurn, InferenceRequest};
    use crate::models::MessageRole;

    #[test]
    fn strips_known_data_url_prefixes() {
        assert_eq!(
            strip_data_url_prefix("data:image/jpeg;base64,AAAA"),
            "AAAA"
        );
        assert_eq!(strip_data_url_prefix("data:image/png;base64,BBBB"), "BBBB");
        assert_eq!(strip_data_url_prefix("CCCC"), "CCCC");
    }

    #[test]
    fn chat_body_maps_roles_and_appends_new_message() {
        let request = InferenceRequest::Chat {
            system_persona: "persona".to_string(),
            history: vec![
                ChatTurn {
                    role: MessageRole::Assistant,
                    content: "hello".to_string(),
                },
                ChatTurn {
                    role: MessageRole::User,
                    content: "hi".to_string(),
                },
            ],
            new_message: "how much protein do I need?".to_string(),
        };

        let body = request_body(&request);
        assert_eq!(body["system_instruction"]["parts"][0]["text"], "persona");
        let contents = body["contents"].as_array().expect("contents array");
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "model");
        assert_eq!(contents[1]["role"], "user");
        assert_eq!(
            contents[2],
            json!({
                "role": "user",
                "parts": [{ "text": "how much protein do I need?" }]
            })
        );
    }

    #[test]
    fn image_body_carries_instruction_and_inline_data() {
        let request = InferenceRequest::ImageAnalysis {
            instruction: "describe".to_string(),
            image: "data:image/jpeg;base64,Zm9v".to_string(),
        };

        let body = request_body(&request);
        let parts = body["contents"][0]["parts"].as_array().expect("parts");
        assert_eq!(parts[0]["text"], "describe");
        assert_eq!(parts[1]["inline_data"]["data"], "Zm9v");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
    }

    #[test]
    fn provider_error_code_prefers_status_over_numeric_code() {
        let body = json!({
            "error": { "code": 429, "status": "RESOURCE_EXHAUSTED", "message": "quota" }
        })
        .to_string();
        assert_eq!(parse_provider_error_code(&body), "RESOURCE_EXHAUSTED");

        let numeric_only = json!({ "error": { "code": 503 } }).to_string();
        assert_eq!(parse_provider_error_code(&numeric_only), "503");

        assert_eq!(parse_provider_error_code("not-json"), "unknown");
    }
}
