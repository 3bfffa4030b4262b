//! The shared analysis pipeline.
//!
//! Every command that looks at real data goes through [`run_analysis`] so the
//! terminal report, the debug bundle, and the integration tests all see the
//! same intermediate values.

use crate::analysis::{aggregate_daily, daypart_breakdown, detect_changepoint, gender_by_day};
use crate::domain::{Changepoint, DailySeries, DaypartBreakdown, GenderDaily, RunConfig, TTest};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_sales};
use crate::stats::one_sample_ttest;

/// The changepoint plus its significance test, bundled because neither is
/// useful alone.
#[derive(Debug, Clone)]
pub struct ChangepointSummary {
    pub changepoint: Changepoint,
    pub ttest: TTest,
}

/// Everything a full run produces.
///
/// The changepoint analysis is held as a `Result` so that a series too short
/// (or too degenerate) to test does not take the gender and daypart analyses
/// down with it.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub series: DailySeries,
    pub changepoint: Result<ChangepointSummary, AppError>,
    pub gender: Vec<GenderDaily>,
    pub dayparts: DaypartBreakdown,
}

/// Load the data and run all analyses.
pub fn run_analysis(config: &RunConfig) -> Result<RunOutput, AppError> {
    let ingest = load_sales(&config.data_dir)?;
    let series = aggregate_daily(&ingest.records);

    let changepoint = detect_changepoint(&series).and_then(|cp| {
        let sample = series.counts_with_delta();
        let ttest = one_sample_ttest(&sample, cp.count as f64)?;
        Ok(ChangepointSummary {
            changepoint: cp,
            ttest,
        })
    });

    let gender = gender_by_day(&ingest.records);
    let dayparts = daypart_breakdown(&ingest.records, config.boundary_mode);

    Ok(RunOutput {
        ingest,
        series,
        changepoint,
        gender,
        dayparts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoundaryMode, ChartSize, PlotConfig};
    use std::io::Write;
    use std::path::Path;

    fn config(data_dir: &Path) -> RunConfig {
        RunConfig {
            data_dir: data_dir.to_path_buf(),
            alpha: 0.05,
            expected_files: 50,
            boundary_mode: BoundaryMode::Strict,
            plot: false,
            plot_config: PlotConfig {
                width: 60,
                height: 10,
            },
            export: None,
            render_dir: None,
            chart_size: ChartSize::default(),
        }
    }

    fn write_day(dir: &Path, day: &str, rows: &[(&str, &str)]) {
        let mut f = std::fs::File::create(dir.join(format!("sales_{day}.csv"))).unwrap();
        writeln!(f, "sale_time,purchaser_gender").unwrap();
        for (ts, g) in rows {
            writeln!(f, "{ts},{g}").unwrap();
        }
    }

    #[test]
    fn short_series_skips_the_changepoint_but_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        write_day(
            dir.path(),
            "2013-04-01",
            &[
                ("2013-04-01 09:15:00", "male"),
                ("2013-04-01 20:30:00", "female"),
            ],
        );

        let out = run_analysis(&config(dir.path())).unwrap();
        assert_eq!(out.series.len(), 1);
        assert!(out.changepoint.is_err());
        assert_eq!(out.gender.len(), 1);
        assert_eq!(out.dayparts.labeled, 2);
    }

    #[test]
    fn full_run_finds_the_jump() {
        let dir = tempfile::tempdir().unwrap();
        // 3 quiet days, then a jump to 9 sales.
        for (day, n) in [
            ("2013-04-01", 3),
            ("2013-04-02", 3),
            ("2013-04-03", 4),
            ("2013-04-04", 9),
            ("2013-04-05", 8),
        ] {
            let rows: Vec<(String, &str)> = (0..n)
                .map(|i| {
                    (
                        format!("{day} 09:{:02}:00", i),
                        if i % 2 == 0 { "male" } else { "female" },
                    )
                })
                .collect();
            let refs: Vec<(&str, &str)> = rows.iter().map(|(t, g)| (t.as_str(), *g)).collect();
            write_day(dir.path(), day, &refs);
        }

        let out = run_analysis(&config(dir.path())).unwrap();
        let summary = out.changepoint.unwrap();
        assert_eq!(summary.changepoint.delta, 5);
        assert_eq!(
            summary.changepoint.day,
            chrono::NaiveDate::from_ymd_opt(2013, 4, 4).unwrap()
        );
        // First day excluded from the sample.
        assert_eq!(summary.ttest.n, 4);
    }

    #[test]
    fn generated_dataset_runs_end_to_end_and_is_deterministic() {
        use crate::data::sample::{SampleConfig, write_sample_dataset};

        let dir = tempfile::tempdir().unwrap();
        let sample = SampleConfig {
            out_dir: dir.path().to_path_buf(),
            days: 30,
            start_day: chrono::NaiveDate::from_ymd_opt(2013, 4, 1).unwrap(),
            seed: 42,
            base_rate: 60.0,
            jump_day: 20,
            jump_factor: 3.0,
            male_share_start: 0.45,
            male_share_end: 0.55,
            unknown_share: 0.02,
        };
        write_sample_dataset(&sample).unwrap();

        let cfg = config(dir.path());
        let a = run_analysis(&cfg).unwrap();
        let b = run_analysis(&cfg).unwrap();

        assert_eq!(a.series, b.series);
        assert_eq!(a.series.len(), 30);
        assert_eq!(a.ingest.files_read, 30);

        // The seeded jump at day index 20 dominates day-over-day noise.
        let summary = a.changepoint.unwrap();
        assert_eq!(
            summary.changepoint.day,
            chrono::NaiveDate::from_ymd_opt(2013, 4, 21).unwrap()
        );
        assert!(summary.ttest.p_value < 0.05);

        // Every record lands in a bucket or on a boundary hour.
        assert_eq!(
            a.dayparts.labeled + a.dayparts.unlabeled,
            a.ingest.rows_used as u64
        );
    }
}
