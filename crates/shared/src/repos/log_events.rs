use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::models::{LogEvent, LogEventKind, NewLogEvent};

use super::{Store, StoreError};

impl Store {
    /// Appends one immutable event. `now` is used when the caller did not
    /// supply an explicit timestamp.
    pub async fn append_log_event(
        &self,
        user_id: i64,
        event: &NewLogEvent,
        now: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        self.ensure_user(user_id).await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO log_events (
                user_id,
                kind,
                logged_at,
                food_name,
                meal_category,
                portion,
                calories,
                protein_g,
                carbs_g,
                fat_g,
                activity_kind,
                duration_minutes,
                distance_km,
                avg_heart_rate,
                calories_burned,
                volume_ml
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING id",
        )
        .bind(user_id)
        .bind(kind_to_db(event.kind))
        .bind(event.logged_at.unwrap_or(now))
        .bind(&event.food_name)
        .bind(&event.meal_category)
        .bind(&event.portion)
        .bind(event.calories)
        .bind(event.protein_g)
        .bind(event.carbs_g)
        .bind(event.fat_g)
        .bind(&event.activity_kind)
        .bind(event.duration_minutes)
        .bind(event.distance_km)
        .bind(event.avg_heart_rate)
        .bind(event.calories_burned)
        .bind(event.volume_ml)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// All events for the user with `logged_at` in `[start, end)`, oldest
    /// first.
    pub async fn query_log_events(
        &self,
        user_id: i64,
        range: (DateTime<Utc>, DateTime<Utc>),
    ) -> Result<Vec<LogEvent>, StoreError> {
        let (start, end) = range;
        let rows = sqlx::query(
            "SELECT
                id,
                user_id,
                kind,
                logged_at,
                food_name,
                meal_category,
                portion,
                calories,
                protein_g,
                carbs_g,
                fat_g,
                activity_kind,
                duration_minutes,
                distance_km,
                avg_heart_rate,
                calories_burned,
                volume_ml
             FROM log_events
             WHERE user_id = $1
               AND logged_at >= $2
               AND logged_at < $3
             ORDER BY logged_at ASC, id ASC",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let kind_raw: String = row.try_get("kind")?;

                Ok(LogEvent {
                    id: row.try_get("id")?,
                    user_id: row.try_get("user_id")?,
                    kind: kind_from_db(&kind_raw)?,
                    logged_at: row.try_get("logged_at")?,
                    food_name: row.try_get("food_name")?,
                    meal_category: row.try_get("meal_category")?,
                    portion: row.try_get("portion")?,
                    calories: row.try_get("calories")?,
                    protein_g: row.try_get("protein_g")?,
                    carbs_g: row.try_get("carbs_g")?,
                    fat_g: row.try_get("fat_g")?,
                    activity_kind: row.try_get("activity_kind")?,
                    duration_minutes: row.try_get("duration_minutes")?,
                    distance_km: row.try_get("distance_km")?,
                    avg_heart_rate: row.try_get("avg_heart_rate")?,
                    calories_burned: row.try_get("calories_burned")?,
                    volume_ml: row.try_get("volume_ml")?,
                })
            })
            .collect()
    }
}

fn kind_to_db(kind: LogEventKind) -> &'static str {
    match kind {
        LogEventKind::Food => "FOOD",
        LogEventKind::Activity => "ACTIVITY",
        LogEventKind::Water => "WATER",
    }
}

fn kind_from_db(value: &str) -> Result<LogEventKind, StoreError> {
    match value {
        "FOOD" => Ok(LogEventKind::Food),
        "ACTIVITY" => Ok(LogEventKind::Activity),
        "WATER" => Ok(LogEventKind::Water),
        _ => Err(StoreError::InvalidData(format!(
            "unknown log event kind persisted: {value}"
        ))),
    }
}
