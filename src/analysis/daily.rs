//! Daily aggregation: records → chronologically ordered daily counts.

use std::collections::BTreeMap;

use crate::domain::{DailySales, DailySeries, SaleRecord};

/// Group records by calendar day and count per group.
///
/// The series is strictly ordered by day ascending with no duplicate keys
/// (the `BTreeMap` guarantees both). Days without records are simply absent;
/// there is no zero-fill. Each entry past the first carries
/// `delta = count - previous day's count` in series order.
pub fn aggregate_daily(records: &[SaleRecord]) -> DailySeries {
    let mut counts: BTreeMap<chrono::NaiveDate, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.sale_day()).or_insert(0) += 1;
    }

    let mut days = Vec::with_capacity(counts.len());
    let mut prev: Option<u64> = None;
    for (day, count) in counts {
        let delta = prev.map(|p| count as i64 - p as i64);
        days.push(DailySales { day, count, delta });
        prev = Some(count);
    }

    DailySeries { days }
}
