use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::errors::{store_error_response, unauthorized_response};
use super::{AppState, AuthUser};

const USER_ID_HEADER: &str = "x-user-id";

/// The transport in front of this service authenticates the caller and
/// forwards only a numeric user id; anything absent or non-numeric is
/// rejected here.
pub(super) async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|id| *id > 0);

    let Some(user_id) = user_id else {
        warn!("missing or invalid {USER_ID_HEADER} header");
        return unauthorized_response();
    };

    if let Err(err) = state.store.ensure_user(user_id).await {
        return store_error_response(err);
    }

    req.extensions_mut().insert(AuthUser { user_id });
    next.run(req).await
}
