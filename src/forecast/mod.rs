/// Forecast window aggregation.
///
/// Converts an irregular, possibly overlapping series of gridded forecast
/// periods into fixed 6-hour and 24-hour precipitation totals via
/// proportional time-overlap weighting. Each period is assumed to deliver
/// its quantity at a linear rate across its span; the portion of that span
/// falling inside a window contributes the matching fraction of the
/// quantity. Pure interval arithmetic on the injected `now` — no wall
/// clock, so tests replay fixed instants.
///
/// Submodules:
/// - `duration` — the ISO 8601 validTime / duration subset grammar.

pub mod duration;

use chrono::{DateTime, Duration, Utc};

use crate::model::ForecastPeriod;

/// Millimeters per inch; totals are summed in millimeters and converted
/// once per window after summation.
pub const MM_PER_INCH: f64 = 25.4;

/// Windowed forecast totals in inches, over `[now, now+6h]` and
/// `[now, now+24h]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowTotals {
    pub total_6hr_in: f64,
    pub total_24hr_in: f64,
}

/// Aggregates forecast periods into 6-hour and 24-hour totals.
///
/// Periods may arrive unsorted, overlapping, or with gaps; contributions
/// are additive and never deduplicated. Fully elapsed periods and periods
/// with a non-positive duration (including unparsable durations encoded as
/// zero) contribute nothing and never abort the aggregation.
pub fn aggregate_windows(periods: &[ForecastPeriod], now: DateTime<Utc>) -> WindowTotals {
    let window_6_end = now + Duration::hours(6);
    let window_24_end = now + Duration::hours(24);

    let mut total_6hr_mm = 0.0;
    let mut total_24hr_mm = 0.0;

    for period in periods {
        if period.duration_hours <= 0.0 {
            continue;
        }

        let period_end = period.start + hours_duration(period.duration_hours);
        if period_end <= now {
            continue; // fully elapsed
        }

        let overlap_6 = overlap_hours(period.start, period_end, now, window_6_end);
        let overlap_24 = overlap_hours(period.start, period_end, now, window_24_end);

        if overlap_6 > 0.0 {
            total_6hr_mm += period.quantity_mm * (overlap_6 / period.duration_hours);
        }
        if overlap_24 > 0.0 {
            total_24hr_mm += period.quantity_mm * (overlap_24 / period.duration_hours);
        }
    }

    WindowTotals {
        total_6hr_in: total_6hr_mm / MM_PER_INCH,
        total_24hr_in: total_24hr_mm / MM_PER_INCH,
    }
}

/// Overlap in hours between `[start, end)` and `[window_start, window_end)`,
/// clamped at zero.
fn overlap_hours(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> f64 {
    let overlap_start = start.max(window_start);
    let overlap_end = end.min(window_end);
    let millis = (overlap_end - overlap_start).num_milliseconds();
    (millis as f64 / 3_600_000.0).max(0.0)
}

fn hours_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0) as i64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
    }

    fn period(start_offset_hours: i64, duration_hours: f64, quantity_mm: f64) -> ForecastPeriod {
        ForecastPeriod {
            start: t0() + Duration::hours(start_offset_hours),
            duration_hours,
            quantity_mm,
        }
    }

    #[test]
    fn test_contiguous_periods_split_across_windows() {
        // 12mm over [T0, T0+6h] plus 36mm over [T0+6h, T0+24h]:
        // the 6h window sees only the first period, the 24h window both.
        let periods = vec![period(0, 6.0, 12.0), period(6, 18.0, 36.0)];
        let totals = aggregate_windows(&periods, t0());

        assert!((totals.total_6hr_in - 12.0 / 25.4).abs() < 1e-9);
        assert!((totals.total_24hr_in - 48.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_empty_series_yields_zero_totals() {
        let totals = aggregate_windows(&[], t0());
        assert_eq!(totals.total_6hr_in, 0.0);
        assert_eq!(totals.total_24hr_in, 0.0);
    }

    #[test]
    fn test_elapsed_period_is_skipped() {
        let periods = vec![period(-12, 6.0, 100.0)];
        let totals = aggregate_windows(&periods, t0());
        assert_eq!(totals.total_6hr_in, 0.0);
        assert_eq!(totals.total_24hr_in, 0.0);
    }

    #[test]
    fn test_zero_duration_period_is_skipped() {
        // Unparsable durations arrive as 0 hours; they must vanish from the
        // totals without aborting the rest of the series.
        let periods = vec![period(1, 0.0, 100.0), period(0, 6.0, 12.0)];
        let totals = aggregate_windows(&periods, t0());
        assert!((totals.total_6hr_in - 12.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_partially_elapsed_period_contributes_remaining_fraction() {
        // Started 3h ago, runs 6h total: 3 of its 6 hours fall inside both
        // windows, so half the quantity counts.
        let periods = vec![period(-3, 6.0, 12.0)];
        let totals = aggregate_windows(&periods, t0());
        assert!((totals.total_6hr_in - 6.0 / 25.4).abs() < 1e-9);
        assert!((totals.total_24hr_in - 6.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_period_straddling_window_end_is_prorated() {
        // [T0+4h, T0+10h): 2 of 6 hours inside the 6h window, all 6 inside
        // the 24h window.
        let periods = vec![period(4, 6.0, 18.0)];
        let totals = aggregate_windows(&periods, t0());
        assert!((totals.total_6hr_in - (18.0 * (2.0 / 6.0)) / 25.4).abs() < 1e-9);
        assert!((totals.total_24hr_in - 18.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_period_beyond_24h_window_is_clipped() {
        // [T0+20h, T0+28h): 4 of 8 hours inside the 24h window, nothing in
        // the 6h window.
        let periods = vec![period(20, 8.0, 16.0)];
        let totals = aggregate_windows(&periods, t0());
        assert_eq!(totals.total_6hr_in, 0.0);
        assert!((totals.total_24hr_in - 8.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_periods_are_additive() {
        // Overlapping grid periods are double-counted by design — the
        // source series is responsible for non-overlap.
        let periods = vec![period(0, 6.0, 12.0), period(0, 6.0, 12.0)];
        let totals = aggregate_windows(&periods, t0());
        assert!((totals.total_6hr_in - 24.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = vec![period(0, 6.0, 12.0), period(6, 18.0, 36.0), period(20, 8.0, 16.0)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = aggregate_windows(&forward, t0());
        let b = aggregate_windows(&reversed, t0());
        assert_eq!(a, b);
    }

    #[test]
    fn test_6hr_total_never_exceeds_24hr_total() {
        // The 6h window is a subset of the 24h window, so for non-negative
        // quantities the 6h total is bounded by the 24h total.
        let periods = vec![
            period(-2, 4.0, 7.5),
            period(1, 1.0, 2.0),
            period(3, 12.0, 30.0),
            period(18, 12.0, 22.0),
        ];
        let totals = aggregate_windows(&periods, t0());
        assert!(
            totals.total_6hr_in <= totals.total_24hr_in,
            "6hr {} should not exceed 24hr {}",
            totals.total_6hr_in,
            totals.total_24hr_in
        );
    }

    #[test]
    fn test_fractional_duration_periods() {
        // A 30-minute period fully inside the 6h window contributes its
        // whole quantity.
        let periods = vec![period(1, 0.5, 5.0)];
        let totals = aggregate_windows(&periods, t0());
        assert!((totals.total_6hr_in - 5.0 / 25.4).abs() < 1e-9);
    }
}
