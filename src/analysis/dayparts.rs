//! Daypart classification: bucketing sales by hour of day.
//!
//! The hour is the timestamp rounded *up* to the next whole hour (a sale at
//! 6:01 counts toward hour 7; a sale exactly on the hour keeps its hour).
//! Under the default strict boundary rules the hours 6, 12, and 18 fall
//! into no bucket; such records are counted separately and excluded from
//! the percentage denominator. See `BoundaryMode` for the alternative.

use chrono::Timelike;

use crate::domain::{BoundaryMode, Daypart, DaypartBreakdown, DaypartShare, SaleRecord};

/// Hour-of-day after ceiling the timestamp to the next whole hour.
///
/// 23:30 rounds into hour 0 of the next day, which lands in `night`.
pub fn ceil_hour(ts: chrono::NaiveDateTime) -> u32 {
    if ts.minute() == 0 && ts.second() == 0 && ts.nanosecond() == 0 {
        ts.hour()
    } else {
        (ts.hour() + 1) % 24
    }
}

/// Map an hour (0–23) to its daypart, if any.
pub fn classify_hour(hour: u32, mode: BoundaryMode) -> Option<Daypart> {
    match mode {
        BoundaryMode::Strict => match hour {
            0..=5 => Some(Daypart::Night),
            7..=11 => Some(Daypart::Morning),
            13..=17 => Some(Daypart::Afternoon),
            19..=23 => Some(Daypart::Evening),
            _ => None,
        },
        BoundaryMode::Inclusive => match hour {
            0..=5 => Some(Daypart::Night),
            6..=11 => Some(Daypart::Morning),
            12..=17 => Some(Daypart::Afternoon),
            18..=23 => Some(Daypart::Evening),
            _ => None,
        },
    }
}

/// Count records per daypart and compute each bucket's share of labeled volume.
pub fn daypart_breakdown(records: &[SaleRecord], mode: BoundaryMode) -> DaypartBreakdown {
    let mut counts = [0u64; 4];
    let mut unlabeled = 0u64;

    for record in records {
        match classify_hour(ceil_hour(record.sale_time), mode) {
            Some(part) => counts[part_index(part)] += 1,
            None => unlabeled += 1,
        }
    }

    let labeled: u64 = counts.iter().sum();
    let shares = Daypart::ALL
        .iter()
        .map(|&part| {
            let count = counts[part_index(part)];
            let share = if labeled == 0 {
                0.0
            } else {
                count as f64 / labeled as f64
            };
            DaypartShare { part, count, share }
        })
        .collect();

    DaypartBreakdown {
        shares,
        labeled,
        unlabeled,
    }
}

fn part_index(part: Daypart) -> usize {
    match part {
        Daypart::Night => 0,
        Daypart::Morning => 1,
        Daypart::Afternoon => 2,
        Daypart::Evening => 3,
    }
}
