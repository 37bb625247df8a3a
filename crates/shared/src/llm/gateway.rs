use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::models::MessageRole;

pub type InferenceFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, InferenceError>> + Send + 'a>>;

/// The two call shapes the orchestrator unifies. Resolved by the caller
/// before any provider is contacted; the gateway never inspects anything
/// beyond this union.
#[derive(Debug, Clone)]
pub enum InferenceRequest {
    ImageAnalysis {
        instruction: String,
        /// Base64 image payload; data-URL prefixes are stripped by the
        /// gateway before transmission.
        image: String,
    },
    Chat {
        system_persona: String,
        /// Recent-history window, already trimmed by the caller.
        history: Vec<ChatTurn>,
        new_message: String,
    },
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference request timed out")]
    Timeout,
    #[error("inference provider request failed: {0}")]
    ProviderFailure(String),
    #[error("inference provider returned an invalid payload: {0}")]
    InvalidProviderPayload(String),
    #[error("inference provider returned empty output")]
    EmptyOutput,
}

/// One remote-inference call against a named variant. Implementations own
/// their transport; the cascade owns ordering and fall-through.
pub trait InferenceGateway: Send + Sync {
    fn call<'a>(&'a self, variant: &'a str, request: &'a InferenceRequest) -> InferenceFuture<'a>;
}
