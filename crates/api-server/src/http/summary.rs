use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::aggregation::{DayRollup, DayTargets, WeekRollup, day_rollup, week_rollup};
use shared::models::{LogEvent, LogEventKind};
use shared::timewindow::{DEFAULT_TIME_ZONE, day_bounds_utc, local_date_for, trailing_dates};

use super::errors::{bad_request_response, store_error_response};
use super::{AppState, AuthUser};

const WEEK_DAYS: u64 = 7;

#[derive(Debug, Deserialize)]
pub(super) struct DaySummaryQuery {
    #[serde(default)]
    date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct DaySummaryResponse {
    rollup: DayRollup,
    targets: DayTargets,
    food: Vec<LogEvent>,
    activities: Vec<LogEvent>,
    water: Vec<LogEvent>,
}

pub(super) async fn day_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DaySummaryQuery>,
) -> Response {
    let profile = match state.store.get_or_create_profile(user.user_id).await {
        Ok(profile) => profile,
        Err(err) => return store_error_response(err),
    };

    let date = query
        .date
        .unwrap_or_else(|| local_date_for(Utc::now(), &profile.time_zone));
    let Some(bounds) = day_bounds_utc(date, &profile.time_zone) else {
        return bad_request_response("invalid_date", "Date has no valid local midnight");
    };

    let events = match state.store.query_log_events(user.user_id, bounds).await {
        Ok(events) => events,
        Err(err) => return store_error_response(err),
    };

    let targets = DayTargets::from(&profile);
    let rollup = day_rollup(date, bounds, &events, &targets);

    let mut food = Vec::new();
    let mut activities = Vec::new();
    let mut water = Vec::new();
    for event in events {
        match event.kind {
            LogEventKind::Food => food.push(event),
            LogEventKind::Activity => activities.push(event),
            LogEventKind::Water => water.push(event),
        }
    }

    (
        StatusCode::OK,
        Json(DaySummaryResponse {
            rollup,
            targets,
            food,
            activities,
            water,
        }),
    )
        .into_response()
}

#[derive(Debug, Serialize)]
struct WeekSummaryResponse {
    #[serde(flatten)]
    rollup: WeekRollup,
    targets: DayTargets,
}

pub(super) async fn week_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DaySummaryQuery>,
) -> Response {
    let profile = match state.store.get_or_create_profile(user.user_id).await {
        Ok(profile) => profile,
        Err(err) => return store_error_response(err),
    };

    let last_day = query
        .date
        .unwrap_or_else(|| local_date_for(Utc::now(), &profile.time_zone));
    let dates = trailing_dates(last_day, WEEK_DAYS);

    // Each day's bounds are resolved independently so DST transitions inside
    // the week shift single days, not the whole series. A date whose local
    // midnight does not exist falls back to UTC bounds.
    let mut windows = Vec::with_capacity(dates.len());
    for date in dates {
        let Some(bounds) = day_bounds_utc(date, &profile.time_zone)
            .or_else(|| day_bounds_utc(date, DEFAULT_TIME_ZONE))
        else {
            return bad_request_response("invalid_date", "Date has no valid local midnight");
        };
        windows.push((date, bounds));
    }

    let span = match (windows.first(), windows.last()) {
        (Some((_, first_bounds)), Some((_, last_bounds))) => (first_bounds.0, last_bounds.1),
        _ => return bad_request_response("invalid_date", "Empty aggregation window"),
    };

    let events = match state.store.query_log_events(user.user_id, span).await {
        Ok(events) => events,
        Err(err) => return store_error_response(err),
    };

    let targets = DayTargets::from(&profile);
    let days = windows
        .into_iter()
        .map(|(date, bounds)| day_rollup(date, bounds, &events, &targets))
        .collect::<Vec<_>>();

    (
        StatusCode::OK,
        Json(WeekSummaryResponse {
            rollup: week_rollup(days),
            targets,
        }),
    )
        .into_response()
}
