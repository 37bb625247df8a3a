use thiserror::Error;
use tracing::warn;

use super::gateway::{InferenceError, InferenceGateway, InferenceRequest};

/// Ordered sequential trial across provider variants. Exactly one attempt is
/// in flight at a time; a failed or empty attempt falls through to the next
/// variant and is never retried.
#[derive(Debug, Clone)]
pub struct ModelCascade {
    variants: Vec<String>,
}

#[derive(Debug)]
pub struct CascadeSuccess {
    pub variant: String,
    pub text: String,
}

#[derive(Debug)]
pub struct VariantFailure {
    pub variant: String,
    pub error: InferenceError,
}

#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("no inference variants configured")]
    NoVariants,
    #[error("all inference variants failed after {} attempts", attempts.len())]
    AllVariantsFailed { attempts: Vec<VariantFailure> },
}

impl ModelCascade {
    pub fn new(variants: Vec<String>) -> Self {
        Self { variants }
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub async fn run(
        &self,
        gateway: &dyn InferenceGateway,
        request: &InferenceRequest,
    ) -> Result<CascadeSuccess, CascadeError> {
        if self.variants.is_empty() {
            return Err(CascadeError::NoVariants);
        }

        let mut attempts = Vec::with_capacity(self.variants.len());
        for variant in &self.variants {
            match gateway.call(variant, request).await {
                Ok(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        warn!(%variant, "inference variant returned empty output");
                        attempts.push(VariantFailure {
                            variant: variant.clone(),
                            error: InferenceError::EmptyOutput,
                        });
                        continue;
                    }

                    return Ok(CascadeSuccess {
                        variant: variant.clone(),
                        text: trimmed.to_string(),
                    });
                }
                Err(error) => {
                    warn!(%variant, %error, "inference variant attempt failed");
                    attempts.push(VariantFailure {
                        variant: variant.clone(),
                        error,
                    });
                }
            }
        }

        Err(CascadeError::AllVariantsFailed { attempts })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::{CascadeError, ModelCascade};
    use crate::llm::gateway::{
        InferenceError, InferenceFuture, InferenceGateway, InferenceRequest,
    };

    /// Scripted per-variant outcomes plus a record of the variants actually
    /// called, in order.
    struct ScriptedGateway {
        outcomes: Vec<(&'static str, Result<&'static str, InferenceError>)>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn new(outcomes: Vec<(&'static str, Result<&'static str, InferenceError>)>) -> Self {
            Self {
                outcomes,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    impl InferenceGateway for ScriptedGateway {
        fn call<'a>(
            &'a self,
            variant: &'a str,
            _request: &'a InferenceRequest,
        ) -> InferenceFuture<'a> {
            Box::pin(async move {
                self.calls
                    .lock()
                    .expect("calls lock")
                    .push(variant.to_string());

                match self
                    .outcomes
                    .iter()
                    .find(|(scripted, _)| *scripted == variant)
                {
                    Some((_, Ok(text))) => Ok((*text).to_string()),
                    Some((_, Err(err))) => Err(clone_error(err)),
                    None => Err(InferenceError::ProviderFailure(
                        "unscripted_variant".to_string(),
                    )),
                }
            })
        }
    }

    fn clone_error(err: &InferenceError) -> InferenceError {
        match err {
            InferenceError::Timeout => InferenceError::Timeout,
            InferenceError::ProviderFailure(message) => {
                InferenceError::ProviderFailure(message.clone())
            }
            InferenceError::InvalidProviderPayload(message) => {
                InferenceError::InvalidProviderPayload(message.clone())
            }
            InferenceError::EmptyOutput => InferenceError::EmptyOutput,
        }
    }

    fn chat_request() -> InferenceRequest {
        InferenceRequest::Chat {
            system_persona: "persona".to_string(),
            history: Vec::new(),
            new_message: "hello".to_string(),
        }
    }

    fn cascade(variants: &[&str]) -> ModelCascade {
        ModelCascade::new(variants.iter().map(ToString::to_string).collect())
    }

    #[tokio::test]
    async fn first_success_short_circuits_remaining_variants() {
        let gateway = ScriptedGateway::new(vec![
            ("a", Err(InferenceError::Timeout)),
            ("b", Ok("answer from b")),
            ("c", Ok("never reached")),
        ]);

        let success = cascade(&["a", "b", "c"])
            .run(&gateway, &chat_request())
            .await
            .expect("second variant should succeed");

        assert_eq!(success.variant, "b");
        assert_eq!(success.text, "answer from b");
        assert_eq!(gateway.calls(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn all_failures_surface_per_variant_attribution() {
        let gateway = ScriptedGateway::new(vec![
            ("a", Err(InferenceError::Timeout)),
            (
                "b",
                Err(InferenceError::ProviderFailure("status=429".to_string())),
            ),
        ]);

        let err = cascade(&["a", "b"])
            .run(&gateway, &chat_request())
            .await
            .expect_err("both variants fail");

        let CascadeError::AllVariantsFailed { attempts } = err else {
            panic!("expected AllVariantsFailed");
        };
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].variant, "a");
        assert!(matches!(attempts[0].error, InferenceError::Timeout));
        assert_eq!(attempts[1].variant, "b");
    }

    #[tokio::test]
    async fn blank_output_counts_as_a_failed_attempt() {
        let gateway = ScriptedGateway::new(vec![("a", Ok("   \n")), ("b", Ok("real reply"))]);

        let success = cascade(&["a", "b"])
            .run(&gateway, &chat_request())
            .await
            .expect("fall through past blank output");

        assert_eq!(success.variant, "b");
        assert_eq!(gateway.calls(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn empty_variant_list_is_rejected_without_calls() {
        let gateway = ScriptedGateway::new(Vec::new());
        let err = cascade(&[])
            .run(&gateway, &chat_request())
            .await
            .expect_err("nothing to try");

        assert!(matches!(err, CascadeError::NoVariants));
        assert!(gateway.calls().is_empty());
    }
}
