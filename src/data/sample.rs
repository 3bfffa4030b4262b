//! Synthetic per-day sales dataset generation.
//!
//! Writes one CSV per calendar day with the same shape as the real input
//! (`sale_time`, `purchaser_gender`), a seeded level jump partway through
//! the window, a drifting gender mix, and a daypart-weighted hour
//! distribution. Useful as a demo path and for integration tests that want
//! a realistic directory without shipping fixtures.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Poisson;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub out_dir: PathBuf,
    /// Number of calendar days (and files) to generate.
    pub days: usize,
    pub start_day: NaiveDate,
    pub seed: u64,
    /// Mean daily sales before the jump.
    pub base_rate: f64,
    /// Day index at which the level jump happens.
    pub jump_day: usize,
    /// Multiplier applied to the rate from `jump_day` onward.
    pub jump_factor: f64,
    /// Male share of gendered sales on the first day...
    pub male_share_start: f64,
    /// ...drifting linearly to this value on the last day.
    pub male_share_end: f64,
    /// Fraction of rows with a missing gender field.
    pub unknown_share: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SampleSummary {
    pub files_written: usize,
    pub rows_written: usize,
}

/// Generate the dataset. Deterministic for a fixed config.
pub fn write_sample_dataset(config: &SampleConfig) -> Result<SampleSummary, AppError> {
    validate(config)?;

    create_dir_all(&config.out_dir).map_err(|e| {
        AppError::render(format!(
            "Failed to create sample dir '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut rows_written = 0usize;

    for i in 0..config.days {
        let day = config.start_day + Duration::days(i as i64);
        let rate = if i >= config.jump_day {
            config.base_rate * config.jump_factor
        } else {
            config.base_rate
        };

        let poisson = Poisson::new(rate)
            .map_err(|e| AppError::render(format!("Invalid sample rate {rate}: {e}")))?;
        let count = (poisson.sample(&mut rng) as u64).max(1);

        let male_share = lerp(
            config.male_share_start,
            config.male_share_end,
            if config.days <= 1 {
                0.0
            } else {
                i as f64 / (config.days - 1) as f64
            },
        );

        let mut rows: Vec<(NaiveDateTime, &'static str)> = (0..count)
            .map(|_| (sale_time(&mut rng, day), gender_field(&mut rng, male_share, config.unknown_share)))
            .collect();
        rows.sort();

        let path = config.out_dir.join(format!("sales_{day}.csv"));
        let mut file = File::create(&path).map_err(|e| {
            AppError::render(format!("Failed to create '{}': {e}", path.display()))
        })?;

        writeln!(file, "sale_time,purchaser_gender")
            .map_err(|e| AppError::render(format!("Failed to write '{}': {e}", path.display())))?;
        for (ts, gender) in &rows {
            writeln!(file, "{},{gender}", ts.format("%Y-%m-%d %H:%M:%S")).map_err(|e| {
                AppError::render(format!("Failed to write '{}': {e}", path.display()))
            })?;
        }

        rows_written += rows.len();
    }

    Ok(SampleSummary {
        files_written: config.days,
        rows_written,
    })
}

fn validate(config: &SampleConfig) -> Result<(), AppError> {
    if config.days == 0 {
        return Err(AppError::render("Sample day count must be > 0."));
    }
    if !(config.base_rate.is_finite() && config.base_rate > 0.0) {
        return Err(AppError::render("Sample base rate must be finite and > 0."));
    }
    if !(config.jump_factor.is_finite() && config.jump_factor > 0.0) {
        return Err(AppError::render("Sample jump factor must be finite and > 0."));
    }
    for share in [
        config.male_share_start,
        config.male_share_end,
        config.unknown_share,
    ] {
        if !(0.0..=1.0).contains(&share) {
            return Err(AppError::render("Sample shares must lie in [0, 1]."));
        }
    }
    Ok(())
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Daypart-weighted sale time within `day`.
///
/// Roughly: 10% night, 25% morning, 37% afternoon, 28% evening.
fn sale_time(rng: &mut StdRng, day: NaiveDate) -> NaiveDateTime {
    let u: f64 = rng.r#gen();
    let hour = if u < 0.10 {
        rng.gen_range(0..6)
    } else if u < 0.35 {
        rng.gen_range(6..12)
    } else if u < 0.72 {
        rng.gen_range(12..18)
    } else {
        rng.gen_range(18..24)
    };

    // Components are range-bounded, so construction cannot fail.
    day.and_hms_opt(hour, rng.gen_range(0..60), rng.gen_range(0..60))
        .unwrap_or_default()
}

fn gender_field(rng: &mut StdRng, male_share: f64, unknown_share: f64) -> &'static str {
    let roll: f64 = rng.r#gen();
    if roll < unknown_share {
        ""
    } else if rng.gen_bool(male_share) {
        "male"
    } else {
        "female"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(out_dir: PathBuf, seed: u64) -> SampleConfig {
        SampleConfig {
            out_dir,
            days: 6,
            start_day: NaiveDate::from_ymd_opt(2013, 4, 1).unwrap(),
            seed,
            base_rate: 40.0,
            jump_day: 3,
            jump_factor: 3.0,
            male_share_start: 0.4,
            male_share_end: 0.6,
            unknown_share: 0.02,
        }
    }

    #[test]
    fn writes_one_file_per_day() {
        let dir = tempfile::tempdir().unwrap();
        let summary = write_sample_dataset(&config(dir.path().to_path_buf(), 7)).unwrap();
        assert_eq!(summary.files_written, 6);
        assert!(summary.rows_written >= 6);

        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 6);
    }

    #[test]
    fn same_seed_reproduces_the_same_bytes() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        write_sample_dataset(&config(a.path().to_path_buf(), 42)).unwrap();
        write_sample_dataset(&config(b.path().to_path_buf(), 42)).unwrap();

        let name = "sales_2013-04-01.csv";
        let left = std::fs::read_to_string(a.path().join(name)).unwrap();
        let right = std::fs::read_to_string(b.path().join(name)).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn zero_days_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path().to_path_buf(), 7);
        cfg.days = 0;
        assert!(write_sample_dataset(&cfg).is_err());
    }
}
