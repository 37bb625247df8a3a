use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const DEFAULT_TIME_ZONE: &str = "UTC";

pub fn normalize_time_zone(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<Tz>().ok().map(|tz| tz.name().to_string())
}

fn parse_time_zone_or_default(value: &str) -> Tz {
    normalize_time_zone(value)
        .and_then(|normalized| normalized.parse::<Tz>().ok())
        .unwrap_or(chrono_tz::UTC)
}

/// The calendar date at `now_utc` in the user's zone. Invalid zone names fall
/// back to UTC rather than failing the read.
pub fn local_date_for(now_utc: DateTime<Utc>, time_zone: &str) -> NaiveDate {
    let tz = parse_time_zone_or_default(time_zone);
    now_utc.with_timezone(&tz).date_naive()
}

/// UTC instants of local midnight and the following local midnight, forming
/// the half-open `[start, end)` window for one calendar day.
pub fn day_bounds_utc(
    local_date: NaiveDate,
    time_zone: &str,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start_of_day = local_date.and_hms_opt(0, 0, 0)?;
    let next_day = local_date.checked_add_days(Days::new(1))?;
    let start_of_next_day = next_day.and_hms_opt(0, 0, 0)?;

    let tz = parse_time_zone_or_default(time_zone);
    let local_start = resolve_local_datetime(&tz, start_of_day)?;
    let local_end = resolve_local_datetime(&tz, start_of_next_day)?;

    Some((
        local_start.with_timezone(&Utc),
        local_end.with_timezone(&Utc),
    ))
}

/// The `count` calendar days ending on `last`, oldest first.
pub fn trailing_dates(last: NaiveDate, count: u64) -> Vec<NaiveDate> {
    (0..count)
        .rev()
        .filter_map(|offset| last.checked_sub_days(Days::new(offset)))
        .collect()
}

fn resolve_local_datetime(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(value) => Some(value),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Timelike, Utc};

    use super::{day_bounds_utc, local_date_for, normalize_time_zone, trailing_dates};

    #[test]
    fn normalize_time_zone_accepts_valid_iana_name() {
        assert_eq!(
            normalize_time_zone("Asia/Jakarta"),
            Some("Asia/Jakarta".to_string())
        );
    }

    #[test]
    fn normalize_time_zone_rejects_invalid_values() {
        assert_eq!(normalize_time_zone(""), None);
        assert_eq!(normalize_time_zone("Mars/Olympus"), None);
    }

    #[test]
    fn local_date_crosses_midnight_ahead_of_utc() {
        // 18:30 UTC is already the next day in Jakarta (UTC+7).
        let now = Utc
            .with_ymd_and_hms(2026, 3, 14, 18, 30, 0)
            .single()
            .expect("valid utc datetime");
        let local_date = local_date_for(now, "Asia/Jakarta");
        assert_eq!(local_date.to_string(), "2026-03-15");
    }

    #[test]
    fn local_date_falls_back_to_utc_for_invalid_zone() {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 14, 18, 30, 0)
            .single()
            .expect("valid utc datetime");
        assert_eq!(local_date_for(now, "not-a-zone").to_string(), "2026-03-14");
    }

    #[test]
    fn day_bounds_convert_local_midnight_to_utc() {
        let local_date = NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid local date");
        let (start_utc, end_utc) = day_bounds_utc(local_date, "Asia/Jakarta").expect("day bounds");

        assert_eq!(start_utc.date_naive().to_string(), "2026-03-14");
        assert_eq!(start_utc.hour(), 17);
        assert_eq!(end_utc.date_naive().to_string(), "2026-03-15");
        assert_eq!(end_utc.hour(), 17);
    }

    #[test]
    fn trailing_dates_are_oldest_first_across_month_boundary() {
        let last = NaiveDate::from_ymd_opt(2026, 3, 3).expect("valid date");
        let dates = trailing_dates(last, 7);
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0].to_string(), "2026-02-25");
        assert_eq!(dates[6].to_string(), "2026-03-03");
    }
}
