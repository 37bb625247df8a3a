use sqlx::Row;

use crate::models::UserProfile;
use crate::timewindow::DEFAULT_TIME_ZONE;

use super::{Store, StoreError};

const DEFAULT_DAILY_CALORIE_TARGET: f64 = 2500.0;
const DEFAULT_DAILY_WATER_TARGET_ML: f64 = 2000.0;

impl Store {
    pub async fn get_or_create_profile(&self, user_id: i64) -> Result<UserProfile, StoreError> {
        self.ensure_user(user_id).await?;

        if let Some(row) = sqlx::query(
            "SELECT daily_calorie_target, daily_water_target_ml, time_zone
             FROM user_profiles
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        {
            return Ok(UserProfile {
                daily_calorie_target: row.try_get("daily_calorie_target")?,
                daily_water_target_ml: row.try_get("daily_water_target_ml")?,
                time_zone: row.try_get("time_zone")?,
            });
        }

        sqlx::query(
            "INSERT INTO user_profiles (user_id, daily_calorie_target, daily_water_target_ml, time_zone)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(DEFAULT_DAILY_CALORIE_TARGET)
        .bind(DEFAULT_DAILY_WATER_TARGET_ML)
        .bind(DEFAULT_TIME_ZONE)
        .execute(&self.pool)
        .await?;

        Ok(UserProfile {
            daily_calorie_target: DEFAULT_DAILY_CALORIE_TARGET,
            daily_water_target_ml: DEFAULT_DAILY_WATER_TARGET_ML,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        })
    }

    pub async fn upsert_profile(
        &self,
        user_id: i64,
        profile: &UserProfile,
    ) -> Result<(), StoreError> {
        self.ensure_user(user_id).await?;

        sqlx::query(
            "INSERT INTO user_profiles (user_id, daily_calorie_target, daily_water_target_ml, time_zone)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id)
             DO UPDATE SET
               daily_calorie_target = EXCLUDED.daily_calorie_target,
               daily_water_target_ml = EXCLUDED.daily_water_target_ml,
               time_zone = EXCLUDED.time_zone,
               updated_at = NOW()",
        )
        .bind(user_id)
        .bind(profile.daily_calorie_target)
        .bind(profile.daily_water_target_ml)
        .bind(&profile.time_zone)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
