use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use shared::models::{
    CreatedResponse, LogActivityRequest, LogEventKind, LogFoodRequest, LogWaterRequest,
    NewLogEvent,
};

use super::errors::{bad_request_response, store_error_response};
use super::{AppState, AuthUser};

pub(super) async fn log_food(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<LogFoodRequest>,
) -> Response {
    let food_name = req.food_name.trim();
    if food_name.is_empty() {
        return bad_request_response("food_name_required", "Food name is required");
    }

    let event = NewLogEvent {
        logged_at: req.logged_at,
        food_name: Some(food_name.to_string()),
        meal_category: req.meal_category,
        portion: req.portion,
        calories: req.calories,
        protein_g: req.protein_g,
        carbs_g: req.carbs_g,
        fat_g: req.fat_g,
        ..NewLogEvent::new(LogEventKind::Food)
    };

    append(&state, user.user_id, event).await
}

pub(super) async fn log_activity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<LogActivityRequest>,
) -> Response {
    let activity_kind = req.activity_kind.trim();
    if activity_kind.is_empty() {
        return bad_request_response("activity_kind_required", "Activity kind is required");
    }

    let event = NewLogEvent {
        logged_at: req.logged_at,
        activity_kind: Some(activity_kind.to_string()),
        duration_minutes: req.duration_minutes,
        distance_km: req.distance_km,
        avg_heart_rate: req.avg_heart_rate,
        calories_burned: req.calories_burned,
        ..NewLogEvent::new(LogEventKind::Activity)
    };

    append(&state, user.user_id, event).await
}

pub(super) async fn log_water(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<LogWaterRequest>,
) -> Response {
    if !req.volume_ml.is_finite() || req.volume_ml <= 0.0 {
        return bad_request_response("volume_required", "Water volume must be positive");
    }

    let event = NewLogEvent {
        logged_at: req.logged_at,
        volume_ml: Some(req.volume_ml),
        ..NewLogEvent::new(LogEventKind::Water)
    };

    append(&state, user.user_id, event).await
}

async fn append(state: &AppState, user_id: i64, event: NewLogEvent) -> Response {
    match state
        .store
        .append_log_event(user_id, &event, Utc::now())
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Err(err) => store_error_response(err),
    }
}
