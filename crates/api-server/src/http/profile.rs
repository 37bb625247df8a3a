use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::models::{OkResponse, UserProfile};
use shared::timewindow::normalize_time_zone;

use super::errors::{bad_request_response, store_error_response};
use super::{AppState, AuthUser};

pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match state.store.get_or_create_profile(user.user_id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => store_error_response(err),
    }
}

pub(super) async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UserProfile>,
) -> Response {
    let Some(time_zone) = normalize_time_zone(&req.time_zone) else {
        return bad_request_response("invalid_time_zone", "Time zone must be a valid IANA name");
    };

    if !req.daily_calorie_target.is_finite()
        || req.daily_calorie_target < 0.0
        || !req.daily_water_target_ml.is_finite()
        || req.daily_water_target_ml < 0.0
    {
        return bad_request_response("invalid_target", "Daily targets must be non-negative");
    }

    let profile = UserProfile {
        daily_calorie_target: req.daily_calorie_target,
        daily_water_target_ml: req.daily_water_target_ml,
        time_zone,
    };

    match state.store.upsert_profile(user.user_id, &profile).await {
        Ok(()) => (StatusCode::OK, Json(OkResponse { ok: true })).into_response(),
        Err(err) => store_error_response(err),
    }
}
