use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::llm::prompts::FOOD_ANALYSIS_INSTRUCTION;
use shared::llm::{InferenceRequest, RecognitionResult, parse_recognition};
use shared::models::AnalyzeFoodRequest;
use tracing::{debug, warn};

use super::AppState;
use super::errors::{bad_gateway_response, bad_request_response, unprocessable_response};

pub(super) async fn analyze_food(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeFoodRequest>,
) -> Response {
    let image = req.image.trim();
    if image.is_empty() {
        return bad_request_response("image_required", "Image data is required");
    }

    let request = InferenceRequest::ImageAnalysis {
        instruction: FOOD_ANALYSIS_INSTRUCTION.to_string(),
        image: image.to_string(),
    };

    let success = match state.image_cascade.run(state.gateway.as_ref(), &request).await {
        Ok(success) => success,
        Err(err) => {
            // No deterministic image-understanding fallback exists; the
            // caller is told to retry.
            warn!("food image analysis failed across all variants: {err}");
            return bad_gateway_response(
                "analysis_unavailable",
                "Food analysis is temporarily unavailable; try again",
            );
        }
    };

    debug!(variant = %success.variant, "food image analyzed");
    match parse_recognition(&success.text) {
        RecognitionResult::Recognized(food) => (StatusCode::OK, Json(food)).into_response(),
        RecognitionResult::Unrecognized { reason } => {
            unprocessable_response("unrecognized_food", &reason)
        }
    }
}
