//! Export the daily series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::DailySeries;
use crate::error::AppError;

/// Write the daily series (day, count, delta) to a CSV file.
///
/// The first day's delta is written as an empty field, not zero.
pub fn write_daily_csv(path: &Path, series: &DailySeries) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::render(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "day,count,delta")
        .map_err(|e| AppError::render(format!("Failed to write export CSV header: {e}")))?;

    for entry in &series.days {
        writeln!(
            file,
            "{},{},{}",
            entry.day,
            entry.count,
            entry.delta.map(|v| v.to_string()).unwrap_or_default()
        )
        .map_err(|e| AppError::render(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailySales;
    use chrono::NaiveDate;

    #[test]
    fn export_round_trips_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily.csv");

        let start = NaiveDate::from_ymd_opt(2013, 4, 1).unwrap();
        let series = DailySeries {
            days: vec![
                DailySales {
                    day: start,
                    count: 100,
                    delta: None,
                },
                DailySales {
                    day: start + chrono::Duration::days(1),
                    count: 120,
                    delta: Some(20),
                },
            ],
        };

        write_daily_csv(&path, &series).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body, "day,count,delta\n2013-04-01,100,\n2013-04-02,120,20\n");
    }
}
