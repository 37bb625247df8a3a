use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{LogEvent, LogEventKind, UserProfile};

/// Per-day targets taken from the user profile. A target of zero means
/// "not set" and always yields 0%; the two cases are deliberately
/// indistinguishable.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DayTargets {
    pub calories: f64,
    pub water_ml: f64,
}

impl From<&UserProfile> for DayTargets {
    fn from(profile: &UserProfile) -> Self {
        Self {
            calories: profile.daily_calorie_target,
            water_ml: profile.daily_water_target_ml,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayRollup {
    pub date: NaiveDate,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub calories_burned: f64,
    pub active_minutes: f64,
    pub water_ml: f64,
    pub food_count: usize,
    pub activity_count: usize,
    pub water_count: usize,
    pub calorie_percent_of_target: u32,
    pub water_percent_of_target: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekRollup {
    pub days: Vec<DayRollup>,
    pub average: WeekAverages,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekAverages {
    pub calories: f64,
    pub calories_burned: f64,
    pub active_minutes: f64,
    pub water_ml: f64,
}

/// Clamped share of a daily target, always within `[0, 100]`.
pub fn percent_of_target(total: f64, target: f64) -> u32 {
    if target <= 0.0 {
        return 0;
    }

    (total / target * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Folds the events whose timestamp falls in `[start, end)` into one day's
/// totals. Events outside the window never contribute; absent numeric fields
/// count as zero. Pure projection, recomputed on every read.
pub fn day_rollup(
    date: NaiveDate,
    bounds: (DateTime<Utc>, DateTime<Utc>),
    events: &[LogEvent],
    targets: &DayTargets,
) -> DayRollup {
    let (start, end) = bounds;
    let mut rollup = DayRollup {
        date,
        calories: 0.0,
        protein_g: 0.0,
        carbs_g: 0.0,
        fat_g: 0.0,
        calories_burned: 0.0,
        active_minutes: 0.0,
        water_ml: 0.0,
        food_count: 0,
        activity_count: 0,
        water_count: 0,
        calorie_percent_of_target: 0,
        water_percent_of_target: 0,
    };

    for event in events {
        if event.logged_at < start || event.logged_at >= end {
            continue;
        }

        match event.kind {
            LogEventKind::Food => {
                rollup.food_count += 1;
                rollup.calories += event.calories.unwrap_or(0.0);
                rollup.protein_g += event.protein_g.unwrap_or(0.0);
                rollup.carbs_g += event.carbs_g.unwrap_or(0.0);
                rollup.fat_g += event.fat_g.unwrap_or(0.0);
            }
            LogEventKind::Activity => {
                rollup.activity_count += 1;
                rollup.calories_burned += event.calories_burned.unwrap_or(0.0);
                rollup.active_minutes += event.duration_minutes.unwrap_or(0.0);
            }
            LogEventKind::Water => {
                rollup.water_count += 1;
                rollup.water_ml += event.volume_ml.unwrap_or(0.0);
            }
        }
    }

    rollup.calorie_percent_of_target = percent_of_target(rollup.calories, targets.calories);
    rollup.water_percent_of_target = percent_of_target(rollup.water_ml, targets.water_ml);
    rollup
}

/// Assembles independently computed day rollups (oldest first) into the week
/// view with per-metric averages.
pub fn week_rollup(days: Vec<DayRollup>) -> WeekRollup {
    let count = days.len().max(1) as f64;
    let average = WeekAverages {
        calories: days.iter().map(|day| day.calories).sum::<f64>() / count,
        calories_burned: days.iter().map(|day| day.calories_burned).sum::<f64>() / count,
        active_minutes: days.iter().map(|day| day.active_minutes).sum::<f64>() / count,
        water_ml: days.iter().map(|day| day.water_ml).sum::<f64>() / count,
    };

    WeekRollup { days, average }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, Utc};

    use super::{DayTargets, day_rollup, percent_of_target, week_rollup};
    use crate::models::{LogEvent, LogEventKind};
    use crate::timewindow::day_bounds_utc;

    fn event(kind: LogEventKind, logged_at: DateTime<Utc>) -> LogEvent {
        LogEvent {
            id: 0,
            user_id: 7,
            kind,
            logged_at,
            food_name: None,
            meal_category: None,
            portion: None,
            calories: None,
            protein_g: None,
            carbs_g: None,
            fat_g: None,
            activity_kind: None,
            duration_minutes: None,
            distance_km: None,
            avg_heart_rate: None,
            calories_burned: None,
            volume_ml: None,
        }
    }

    fn food(logged_at: DateTime<Utc>, calories: f64, protein_g: f64) -> LogEvent {
        LogEvent {
            calories: Some(calories),
            protein_g: Some(protein_g),
            ..event(LogEventKind::Food, logged_at)
        }
    }

    fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
        date.and_hms_opt(hour, 0, 0).expect("valid time").and_utc()
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).expect("valid date")
    }

    #[test]
    fn totals_are_a_sum_over_in_window_events_only() {
        let date = march(10);
        let bounds = day_bounds_utc(date, "UTC").expect("bounds");
        let events = vec![
            food(at(date, 8), 450.0, 20.0),
            food(at(date, 13), 600.0, 30.0),
            // Previous day, must not contribute.
            food(at(march(9), 20), 900.0, 40.0),
        ];

        let rollup = day_rollup(date, bounds, &events, &DayTargets::default());
        assert_eq!(rollup.calories, 1050.0);
        assert_eq!(rollup.protein_g, 50.0);
        assert_eq!(rollup.food_count, 2);
    }

    #[test]
    fn next_day_midnight_is_excluded() {
        let date = march(10);
        let bounds = day_bounds_utc(date, "UTC").expect("bounds");
        let events = vec![
            // Exactly 00:00 of day N is included.
            food(at(date, 0), 100.0, 0.0),
            // Exactly 00:00 of day N+1 is excluded.
            food(at(march(11), 0), 500.0, 0.0),
        ];

        let rollup = day_rollup(date, bounds, &events, &DayTargets::default());
        assert_eq!(rollup.calories, 100.0);
        assert_eq!(rollup.food_count, 1);
    }

    #[test]
    fn mixed_kinds_fold_into_separate_metrics() {
        let date = march(10);
        let bounds = day_bounds_utc(date, "UTC").expect("bounds");
        let activity = LogEvent {
            calories_burned: Some(320.0),
            duration_minutes: Some(45.0),
            ..event(LogEventKind::Activity, at(date, 7))
        };
        let water = LogEvent {
            volume_ml: Some(250.0),
            ..event(LogEventKind::Water, at(date, 9))
        };
        // Activity with no numeric fields counts as zero, not an error.
        let bare_activity = event(LogEventKind::Activity, at(date, 18));

        let rollup = day_rollup(
            date,
            bounds,
            &[activity, water, bare_activity],
            &DayTargets::default(),
        );
        assert_eq!(rollup.calories_burned, 320.0);
        assert_eq!(rollup.active_minutes, 45.0);
        assert_eq!(rollup.water_ml, 250.0);
        assert_eq!(rollup.activity_count, 2);
        assert_eq!(rollup.water_count, 1);
    }

    #[test]
    fn percent_of_target_is_clamped_and_zero_safe() {
        assert_eq!(percent_of_target(1250.0, 2500.0), 50);
        assert_eq!(percent_of_target(9000.0, 2500.0), 100);
        assert_eq!(percent_of_target(500.0, 0.0), 0);
        assert_eq!(percent_of_target(0.0, 2500.0), 0);
    }

    #[test]
    fn empty_day_with_target_set_reports_zero_percent() {
        let date = march(10);
        let bounds = day_bounds_utc(date, "UTC").expect("bounds");
        let targets = DayTargets {
            calories: 2500.0,
            water_ml: 2000.0,
        };

        let rollup = day_rollup(date, bounds, &[], &targets);
        assert_eq!(rollup.calories, 0.0);
        assert_eq!(rollup.calorie_percent_of_target, 0);
        assert_eq!(rollup.water_percent_of_target, 0);
    }

    #[test]
    fn week_averages_span_all_seven_days() {
        let targets = DayTargets::default();
        let days = (10..17)
            .map(|day| {
                let date = march(day);
                let bounds = day_bounds_utc(date, "UTC").expect("bounds");
                let events = vec![food(at(date, 12), 700.0, 0.0)];
                day_rollup(date, bounds, &events, &targets)
            })
            .collect::<Vec<_>>();

        let week = week_rollup(days);
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.average.calories, 700.0);
        assert_eq!(week.days[0].date, march(10));
        assert_eq!(week.days[6].date, march(16));
    }
}
