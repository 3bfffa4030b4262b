//! Changepoint detection: the day with the largest day-over-day increase.

use crate::domain::{Changepoint, DailySeries};
use crate::error::AppError;

/// Stable argmax over the defined deltas of the series.
///
/// Ties resolve to the earliest day (the scan runs in chronological order
/// and only a strictly greater delta replaces the current best). The first
/// day's undefined delta is excluded, not treated as zero.
pub fn detect_changepoint(series: &DailySeries) -> Result<Changepoint, AppError> {
    if series.len() < 2 {
        return Err(AppError::insufficient_data(format!(
            "Changepoint detection needs at least 2 aggregated days, got {}.",
            series.len()
        )));
    }

    let mut best: Option<Changepoint> = None;
    for entry in &series.days {
        let Some(delta) = entry.delta else { continue };
        if best.as_ref().is_none_or(|b| delta > b.delta) {
            best = Some(Changepoint {
                day: entry.day,
                count: entry.count,
                delta,
            });
        }
    }

    best.ok_or_else(|| AppError::insufficient_data("No day-over-day deltas available."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailySales;
    use chrono::NaiveDate;

    fn series(counts: &[u64]) -> DailySeries {
        let start = NaiveDate::from_ymd_opt(2013, 4, 1).unwrap();
        let mut days = Vec::new();
        let mut prev: Option<u64> = None;
        for (i, &count) in counts.iter().enumerate() {
            days.push(DailySales {
                day: start + chrono::Duration::days(i as i64),
                count,
                delta: prev.map(|p| count as i64 - p as i64),
            });
            prev = Some(count);
        }
        DailySeries { days }
    }

    #[test]
    fn picks_the_largest_increase() {
        let s = series(&[100, 100, 100, 500, 100]);
        let cp = detect_changepoint(&s).unwrap();
        assert_eq!(cp.day, NaiveDate::from_ymd_opt(2013, 4, 4).unwrap());
        assert_eq!(cp.count, 500);
        assert_eq!(cp.delta, 400);
    }

    #[test]
    fn ties_resolve_to_the_earliest_day() {
        // Deltas: +50 on day 2 and +50 on day 4.
        let s = series(&[100, 150, 100, 150]);
        let cp = detect_changepoint(&s).unwrap();
        assert_eq!(cp.day, NaiveDate::from_ymd_opt(2013, 4, 2).unwrap());
    }

    #[test]
    fn selected_delta_dominates_all_others() {
        let s = series(&[90, 140, 70, 260, 250, 300]);
        let cp = detect_changepoint(&s).unwrap();
        for d in &s.days {
            if let Some(delta) = d.delta {
                assert!(cp.delta >= delta);
            }
        }
    }

    #[test]
    fn single_day_is_insufficient() {
        let s = series(&[100]);
        let err = detect_changepoint(&s).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
