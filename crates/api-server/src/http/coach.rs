use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::llm::prompts::COACH_SYSTEM_PERSONA;
use shared::llm::{ChatTurn, InferenceRequest, fallback};
use shared::models::{MessageRole, PostCoachMessageRequest, PostCoachMessageResponse};
use tracing::warn;

use super::errors::{bad_request_response, not_found_response, store_error_response};
use super::{AppState, AuthUser};

/// Messages sent to the provider per turn: the new user message plus up to
/// nine preceding turns.
const CHAT_HISTORY_WINDOW: i64 = 10;

pub(super) async fn get_conversation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match state.store.get_or_create_conversation(user.user_id).await {
        Ok(conversation) => (StatusCode::OK, Json(conversation)).into_response(),
        Err(err) => store_error_response(err),
    }
}

pub(super) async fn post_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PostCoachMessageRequest>,
) -> Response {
    let content = req.content.trim();
    if content.is_empty() {
        return bad_request_response("content_required", "Message content is required");
    }

    match state.store.conversation_owner(req.conversation_id).await {
        Ok(Some(owner)) if owner == user.user_id => {}
        Ok(_) => return not_found_response("conversation_not_found", "Conversation not found"),
        Err(err) => return store_error_response(err),
    }

    // The user turn is persisted before generation so it survives provider
    // failures.
    let user_message = match state
        .store
        .append_coach_message(req.conversation_id, MessageRole::User, content)
        .await
    {
        Ok(message) => message,
        Err(err) => return store_error_response(err),
    };

    let mut window = match state
        .store
        .recent_coach_messages(req.conversation_id, CHAT_HISTORY_WINDOW)
        .await
    {
        Ok(window) => window,
        Err(err) => return store_error_response(err),
    };
    // The just-appended user turn goes to the provider as the new message,
    // not as history.
    window.pop();

    let request = InferenceRequest::Chat {
        system_persona: COACH_SYSTEM_PERSONA.to_string(),
        history: window
            .into_iter()
            .map(|message| ChatTurn {
                role: message.role,
                content: message.content,
            })
            .collect(),
        new_message: content.to_string(),
    };

    let reply = match state.chat_cascade.run(state.gateway.as_ref(), &request).await {
        Ok(success) => success.text,
        Err(err) => {
            warn!("coach reply generation failed, using fallback responder: {err}");
            fallback::respond(content).to_string()
        }
    };

    let assistant_message = match state
        .store
        .append_coach_message(req.conversation_id, MessageRole::Assistant, &reply)
        .await
    {
        Ok(message) => message,
        Err(err) => return store_error_response(err),
    };

    (
        StatusCode::OK,
        Json(PostCoachMessageResponse {
            user_message,
            assistant_message,
        }),
    )
        .into_response()
}
