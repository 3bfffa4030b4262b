//! Demographic analysis: per-day male/female sales counts.
//!
//! This component performs no statistical inference; it prepares the
//! ratio/volume series for visual comparison against the daily trend.

use std::collections::BTreeMap;

use crate::domain::{Gender, GenderDaily, SaleRecord};

/// Group records by (day, gender) and pivot into one entry per day.
///
/// Unknown-gender records are excluded from both counts; a day whose records
/// are all unknown does not appear at all. Output is ordered by day.
pub fn gender_by_day(records: &[SaleRecord]) -> Vec<GenderDaily> {
    let mut by_day: BTreeMap<chrono::NaiveDate, (u64, u64)> = BTreeMap::new();
    for record in records {
        let entry = match record.gender {
            Gender::Male => &mut by_day.entry(record.sale_day()).or_insert((0, 0)).0,
            Gender::Female => &mut by_day.entry(record.sale_day()).or_insert((0, 0)).1,
            Gender::Unknown => continue,
        };
        *entry += 1;
    }

    by_day
        .into_iter()
        .map(|(day, (male, female))| GenderDaily { day, male, female })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(d: u32, gender: Gender) -> SaleRecord {
        SaleRecord {
            sale_time: NaiveDate::from_ymd_opt(2013, 2, d)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            gender,
        }
    }

    #[test]
    fn pivots_counts_per_day() {
        let records = vec![
            record(1, Gender::Male),
            record(1, Gender::Male),
            record(1, Gender::Female),
            record(2, Gender::Female),
            record(2, Gender::Unknown),
        ];
        let series = gender_by_day(&records);
        assert_eq!(series.len(), 2);

        assert_eq!(series[0].male, 2);
        assert_eq!(series[0].female, 1);
        assert_eq!(series[0].ratio(), Some(2.0));
        assert_eq!(series[0].total(), 3);

        // Unknown excluded from both counts and from the total.
        assert_eq!(series[1].male, 0);
        assert_eq!(series[1].female, 1);
        assert_eq!(series[1].total(), 1);
    }

    #[test]
    fn all_unknown_day_is_absent() {
        let records = vec![record(3, Gender::Unknown)];
        assert!(gender_by_day(&records).is_empty());
    }
}
