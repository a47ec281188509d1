//! Reduces 3-hour forecast samples to one entry per calendar day.

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::model::{ForecastDayPoint, ForecastSample};

pub const MAX_FORECAST_DAYS: usize = 5;

/// Keep the first sample seen for each calendar date in `tz`, for at most
/// [`MAX_FORECAST_DAYS`] dates, in the order the dates are first met.
pub fn daily_forecast<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<ForecastDayPoint> {
    let mut seen: Vec<NaiveDate> = Vec::with_capacity(MAX_FORECAST_DAYS);
    let mut days = Vec::with_capacity(MAX_FORECAST_DAYS);

    for sample in samples {
        let Some(date) = calendar_date(sample.timestamp_secs, tz) else {
            tracing::debug!(
                ts = sample.timestamp_secs,
                "skipping forecast sample with invalid timestamp"
            );
            continue;
        };

        if seen.contains(&date) || seen.len() >= MAX_FORECAST_DAYS {
            continue;
        }

        seen.push(date);
        days.push(ForecastDayPoint::from(sample.clone()));
    }

    days
}

/// [`daily_forecast`] in the machine's local time zone.
pub fn daily_forecast_local(samples: &[ForecastSample]) -> Vec<ForecastDayPoint> {
    daily_forecast(samples, &Local)
}

fn calendar_date<Tz: TimeZone>(ts: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|utc| utc.with_timezone(tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    const DAY: i64 = 86_400;

    fn sample(ts: i64, temp: f64) -> ForecastSample {
        ForecastSample {
            timestamp_secs: ts,
            temperature_c: temp,
            description: "clear sky".to_string(),
        }
    }

    #[test]
    fn keeps_first_sample_per_day() {
        let samples = vec![
            sample(1_000_000_000, 20.0),
            sample(1_000_003_600, 21.0),
            sample(1_000_090_000, 18.0),
        ];

        let days = daily_forecast(&samples, &Utc);

        let got: Vec<(i64, f64)> =
            days.iter().map(|d| (d.timestamp_secs, d.temperature_c)).collect();
        assert_eq!(got, vec![(1_000_000_000, 20.0), (1_000_090_000, 18.0)]);
    }

    #[test]
    fn caps_at_five_days() {
        // 8 samples per day over 7 days, like the 3-hour feed.
        let start = 1_700_000_000 - 1_700_000_000 % DAY;
        let samples: Vec<_> = (0..56).map(|i| sample(start + i * 3 * 3600, i as f64)).collect();

        let days = daily_forecast(&samples, &Utc);

        assert_eq!(days.len(), MAX_FORECAST_DAYS);
        for (n, day) in days.iter().enumerate() {
            assert_eq!(day.timestamp_secs, start + n as i64 * DAY);
        }
    }

    #[test]
    fn fewer_dates_than_cap() {
        let samples = vec![sample(0, 1.0), sample(DAY, 2.0), sample(DAY + 60, 3.0)];
        let days = daily_forecast(&samples, &Utc);
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].temperature_c, 2.0);
    }

    #[test]
    fn no_sorting_of_out_of_order_input() {
        let samples = vec![sample(2 * DAY, 3.0), sample(0, 1.0), sample(2 * DAY + 10, 9.0)];
        let days = daily_forecast(&samples, &Utc);
        let temps: Vec<f64> = days.iter().map(|d| d.temperature_c).collect();
        assert_eq!(temps, vec![3.0, 1.0]);
    }

    #[test]
    fn date_boundary_follows_time_zone() {
        // 23:30 and 00:30 UTC are the same day at UTC-2.
        let samples = vec![sample(DAY - 1800, 1.0), sample(DAY + 1800, 2.0)];

        assert_eq!(daily_forecast(&samples, &Utc).len(), 2);

        let minus_two = FixedOffset::west_opt(2 * 3600).unwrap();
        assert_eq!(daily_forecast(&samples, &minus_two).len(), 1);
    }

    #[test]
    fn empty_input() {
        assert!(daily_forecast(&[], &Utc).is_empty());
    }
}
