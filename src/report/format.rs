//! Report formatting.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{Changepoint, DailySeries, DaypartBreakdown, GenderDaily, RunConfig, TTest};
use crate::io::ingest::{IngestedData, RowError};

/// Format the run summary (ingest stats + series span).
pub fn format_run_summary(
    ingest: &IngestedData,
    series: &DailySeries,
    config: &RunConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== pulse - Daily Sales Explorer ===\n");
    out.push_str(&format!("Input: {}\n", config.data_dir.display()));
    out.push_str(&format!(
        "Files: {} (expected {})\n",
        ingest.files_read, config.expected_files
    ));
    out.push_str(&format!(
        "Rows: {} read | {} used | {} dropped\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));

    match (series.days.first(), series.days.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "Days: {} spanning {}..{}\n",
                series.len(),
                first.day,
                last.day
            ));
        }
        _ => out.push_str("Days: 0\n"),
    }
    out.push_str(&format!("Total sales: {}\n", series.total_count()));

    out
}

/// Format the first few row-level errors so the operator can act on them.
pub fn format_row_errors(errors: &[RowError], max: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Dropped rows ({}):\n", errors.len()));
    for err in errors.iter().take(max) {
        out.push_str(&format!(
            "- {}:{}: {}\n",
            err.file.display(),
            err.line,
            err.message
        ));
    }
    if errors.len() > max {
        out.push_str(&format!("  (and {} more)\n", errors.len() - max));
    }
    out
}

/// Format the changepoint findings and the significance verdict.
pub fn format_changepoint_summary(cp: &Changepoint, ttest: &TTest, alpha: f64) -> String {
    let mut out = String::new();

    out.push_str("Changepoint:\n");
    out.push_str(&format!(
        "- day: {} (count {}, day-over-day {:+})\n",
        cp.day, cp.count, cp.delta
    ));
    out.push_str(&format!(
        "- t-test vs. daily counts: t={:.3}, p={} (n={})\n",
        ttest.statistic,
        fmt_p_value(ttest.p_value),
        ttest.n
    ));
    out.push_str(&format!(
        "- significant at alpha={alpha}: {}\n",
        if ttest.is_significant(alpha) { "yes" } else { "no" }
    ));

    out
}

/// Format overall gender totals (the plot carries the per-day detail).
pub fn format_gender_summary(gender: &[GenderDaily]) -> String {
    let mut out = String::new();

    let male: u64 = gender.iter().map(|g| g.male).sum();
    let female: u64 = gender.iter().map(|g| g.female).sum();
    let undefined_days = gender.iter().filter(|g| g.ratio().is_none()).count();

    out.push_str("Gender split (male/female only):\n");
    out.push_str(&format!("- days covered: {}\n", gender.len()));
    out.push_str(&format!(
        "- totals: male {male} | female {female} | overall ratio {}\n",
        if female == 0 {
            "n/a".to_string()
        } else {
            format!("{:.3}", male as f64 / female as f64)
        }
    ));
    out.push_str(&format!(
        "- days with undefined ratio (no female sales): {undefined_days}\n"
    ));

    out
}

/// Format the daypart table.
pub fn format_daypart_table(breakdown: &DaypartBreakdown) -> String {
    let mut out = String::new();

    out.push_str("Daypart share of sales:\n");
    out.push_str(&format!("{:<10} {:>9} {:>9}\n", "daypart", "count", "share"));
    out.push_str(&format!("{:-<10} {:-<9} {:-<9}\n", "", "", ""));

    for share in &breakdown.shares {
        out.push_str(&format!(
            "{:<10} {:>9} {:>8.1}%\n",
            share.part.display_name(),
            share.count,
            share.share * 100.0
        ));
    }
    out.push_str(&format!(
        "{:<10} {:>9} {:>8.1}%\n",
        "labeled", breakdown.labeled, 100.0
    ));
    if breakdown.unlabeled > 0 {
        out.push_str(&format!(
            "{:<10} {:>9} {:>9}\n",
            "unlabeled", breakdown.unlabeled, "-"
        ));
    }

    out
}

fn fmt_p_value(p: f64) -> String {
    if p < 1e-4 {
        format!("{p:.3e}")
    } else {
        format!("{p:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Daypart, DaypartShare};
    use chrono::NaiveDate;

    #[test]
    fn changepoint_summary_reports_the_verdict() {
        let cp = Changepoint {
            day: NaiveDate::from_ymd_opt(2013, 4, 29).unwrap(),
            count: 732,
            delta: 417,
        };
        let ttest = TTest {
            statistic: -61.713,
            p_value: 1.3e-84,
            n: 348,
        };
        let text = format_changepoint_summary(&cp, &ttest, 0.05);
        assert!(text.contains("2013-04-29"));
        assert!(text.contains("+417"));
        assert!(text.contains("1.300e-84"));
        assert!(text.contains("significant at alpha=0.05: yes"));
    }

    #[test]
    fn daypart_table_lists_all_four_parts_and_unlabeled() {
        let breakdown = DaypartBreakdown {
            shares: Daypart::ALL
                .iter()
                .map(|&part| DaypartShare {
                    part,
                    count: 25,
                    share: 0.25,
                })
                .collect(),
            labeled: 100,
            unlabeled: 3,
        };
        let text = format_daypart_table(&breakdown);
        for part in Daypart::ALL {
            assert!(text.contains(part.display_name()));
        }
        assert!(text.contains("25.0%"));
        assert!(text.contains("unlabeled"));
    }

    #[test]
    fn gender_summary_handles_zero_female_total() {
        let gender = vec![GenderDaily {
            day: NaiveDate::from_ymd_opt(2013, 1, 1).unwrap(),
            male: 5,
            female: 0,
        }];
        let text = format_gender_summary(&gender);
        assert!(text.contains("overall ratio n/a"));
        assert!(text.contains("undefined ratio (no female sales): 1"));
    }

    #[test]
    fn p_values_format_scientifically_when_tiny() {
        assert_eq!(fmt_p_value(0.0321), "0.0321");
        assert_eq!(fmt_p_value(1.3019e-84), "1.302e-84");
    }
}
