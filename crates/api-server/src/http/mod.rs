use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::llm::{InferenceGateway, ModelCascade};
use shared::repos::Store;

mod authn;
mod coach;
mod errors;
mod health;
mod logs;
mod profile;
mod recognition;
mod summary;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub gateway: Arc<dyn InferenceGateway>,
    pub image_cascade: ModelCascade,
    pub chat_cascade: ModelCascade,
}

#[derive(Clone, Copy)]
pub(super) struct AuthUser {
    pub(super) user_id: i64,
}

pub fn build_router(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .with_state(app_state.clone());

    let auth_layer_state = app_state.clone();

    let protected_routes = Router::new()
        .route("/v1/ai/analyze-food", post(recognition::analyze_food))
        .route("/v1/coach", get(coach::get_conversation))
        .route("/v1/coach/messages", post(coach::post_message))
        .route("/v1/summary/day", get(summary::day_summary))
        .route("/v1/summary/week", get(summary::week_summary))
        .route("/v1/logs/food", post(logs::log_food))
        .route("/v1/logs/activity", post(logs::log_activity))
        .route("/v1/logs/water", post(logs::log_water))
        .route(
            "/v1/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .layer(middleware::from_fn_with_state(
            auth_layer_state,
            authn::auth_middleware,
        ))
        .with_state(app_state);

    public_routes.merge(protected_routes)
}
