//! Command-line parsing for the daily sales explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::BoundaryMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pulse", version, about = "Daily retail sales explorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the per-day CSVs, run the analyses, print the report.
    Report(ReportArgs),
    /// Generate a synthetic per-day CSV dataset.
    Sample(SampleArgs),
    /// Run the analyses and write a markdown debug bundle.
    ///
    /// This uses the same underlying pipeline as `pulse report`, but dumps
    /// every intermediate table for offline inspection.
    Debug(ReportArgs),
}

/// Common options for reporting and debugging.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Directory holding the per-day sales CSVs.
    #[arg(short = 'd', long, env = "PULSE_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Significance threshold for the changepoint t-test verdict.
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,

    /// Expected number of input files (informational, never enforced).
    #[arg(long, default_value_t = 50)]
    pub expected_files: usize,

    /// How the boundary hours (6, 12, 18) are bucketed.
    #[arg(long, value_enum, default_value_t = BoundaryMode::Strict)]
    pub daypart_boundaries: BoundaryMode,

    /// Render ASCII plots in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the daily series (day, count, delta) to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Write SVG charts (daily trend, gender, dayparts) into this directory.
    #[arg(long = "render-dir")]
    pub render_dir: Option<PathBuf>,
}

/// Options for the synthetic dataset generator.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Directory to write the generated CSVs into.
    #[arg(short = 'o', long, default_value = "data")]
    pub out_dir: PathBuf,

    /// Number of calendar days (one file per day).
    #[arg(long, default_value_t = 350)]
    pub days: usize,

    /// First calendar day of the dataset.
    #[arg(long, default_value = "2013-01-01")]
    pub start: NaiveDate,

    /// Random seed; fixed seed reproduces the dataset byte for byte.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Mean daily sales before the level jump.
    #[arg(long, default_value_t = 150.0)]
    pub base_rate: f64,

    /// Day index at which the level jump happens.
    #[arg(long, default_value_t = 210)]
    pub jump_day: usize,

    /// Multiplier applied to the rate from the jump day onward.
    #[arg(long, default_value_t = 3.0)]
    pub jump_factor: f64,

    /// Male share of gendered sales on the first day.
    #[arg(long, default_value_t = 0.45)]
    pub male_share_start: f64,

    /// Male share of gendered sales on the last day.
    #[arg(long, default_value_t = 0.55)]
    pub male_share_end: f64,

    /// Fraction of rows with a blank gender field.
    #[arg(long, default_value_t = 0.02)]
    pub unknown_share: f64,
}
