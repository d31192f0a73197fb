use crate::models::HourPoint;
use chrono::{DateTime, Utc};

pub const WINDOW_HOURS: usize = 24;

/// The next 24 hours of the series, starting at the first hour at or after `now`.
///
/// If every timestamp is in the past (a stale series) the window starts at the
/// beginning of the series instead. Short input gives a short window.
pub fn slice_rolling_window(hourly: &[HourPoint], now: DateTime<Utc>) -> &[HourPoint] {
    let start = hourly
        .iter()
        .position(|p| p.timestamp.with_timezone(&Utc) >= now)
        .unwrap_or(0);
    let end = start.saturating_add(WINDOW_HOURS).min(hourly.len());
    &hourly[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn series(start: DateTime<FixedOffset>, count: usize) -> Vec<HourPoint> {
        (0..count)
            .map(|i| HourPoint {
                timestamp: start + Duration::hours(i as i64),
                temp_c: 20.0 + i as f64,
                humidity_percent: 60.0,
                precip_probability: None,
                wind_speed_kmh: 10.0,
                wind_gust_kmh: None,
            })
            .collect()
    }

    fn ist_midnight() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(19800)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 1, 0, 0, 0)
            .unwrap()
    }

    #[test]
    fn starts_at_first_hour_not_before_now() {
        let hourly = series(ist_midnight(), 72);
        // 10:30 IST
        let now = (ist_midnight() + Duration::minutes(630)).with_timezone(&Utc);

        let window = slice_rolling_window(&hourly, now);
        assert_eq!(window.len(), 24);
        assert_eq!(window[0].timestamp, ist_midnight() + Duration::hours(11));
        assert!(window.iter().all(|p| p.timestamp.with_timezone(&Utc) >= now));
    }

    #[test]
    fn exact_hour_is_included() {
        let hourly = series(ist_midnight(), 48);
        let now = (ist_midnight() + Duration::hours(5)).with_timezone(&Utc);
        assert_eq!(slice_rolling_window(&hourly, now)[0].timestamp, ist_midnight() + Duration::hours(5));
    }

    #[test]
    fn truncates_near_end_of_series() {
        let hourly = series(ist_midnight(), 30);
        let now = (ist_midnight() + Duration::hours(20)).with_timezone(&Utc);
        assert_eq!(slice_rolling_window(&hourly, now).len(), 10);
    }

    #[test]
    fn stale_series_falls_back_to_start() {
        let hourly = series(ist_midnight(), 30);
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let window = slice_rolling_window(&hourly, now);
        assert_eq!(window.len(), 24);
        assert_eq!(window[0].timestamp, ist_midnight());
    }

    #[test]
    fn empty_series_gives_empty_window() {
        assert!(slice_rolling_window(&[], Utc::now()).is_empty());
    }

    #[test]
    fn window_is_capped_at_a_day() {
        let hourly = series(ist_midnight(), 168);
        let now = ist_midnight().with_timezone(&Utc);
        let window = slice_rolling_window(&hourly, now);
        assert_eq!(window.len(), WINDOW_HOURS);
        assert_eq!(window[WINDOW_HOURS - 1].timestamp, ist_midnight() + Duration::hours(23));
    }
}
