//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during analysis
//! - exported to CSV/markdown
//! - rendered into plots without further transformation

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Purchaser gender as a closed enumeration.
///
/// The input files store this as a free-form string; anything that is not
/// recognizably `male` or `female` (including an empty field) maps to
/// `Unknown`. Unknown is data, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Lossy parse: unrecognized or empty input becomes `Unknown`.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// One sales transaction, immutable after ingest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Naive local timestamp; no timezone conversion is applied anywhere.
    pub sale_time: NaiveDateTime,
    pub gender: Gender,
}

impl SaleRecord {
    /// Calendar day for aggregation (timestamp truncated to date).
    pub fn sale_day(&self) -> NaiveDate {
        self.sale_time.date()
    }
}

/// One entry of the daily sales series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    pub day: NaiveDate,
    pub count: u64,
    /// Count minus the previous day's count in series order.
    ///
    /// `None` for the first day (there is nothing to diff against); absent
    /// days are not zero-filled, so the delta spans whatever gap exists.
    pub delta: Option<i64>,
}

/// Daily sales counts, strictly ordered by day ascending, no duplicate keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailySeries {
    pub days: Vec<DailySales>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Sum of all daily counts (equals the loaded record count).
    pub fn total_count(&self) -> u64 {
        self.days.iter().map(|d| d.count).sum()
    }

    /// Counts of the days that carry a defined delta (first day excluded).
    ///
    /// This is the sample the significance test runs on: undefined deltas
    /// are dropped, never imputed.
    pub fn counts_with_delta(&self) -> Vec<f64> {
        self.days
            .iter()
            .filter(|d| d.delta.is_some())
            .map(|d| d.count as f64)
            .collect()
    }
}

/// The detected changepoint: the day with the largest day-over-day increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changepoint {
    pub day: NaiveDate,
    pub count: u64,
    pub delta: i64,
}

/// One-sample t-test output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTest {
    pub statistic: f64,
    pub p_value: f64,
    /// Sample size the test ran on.
    pub n: usize,
}

impl TTest {
    /// Interpretation policy only; the test itself never enforces a cutoff.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Per-day male/female sales counts.
///
/// Unknown-gender records are excluded from both counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderDaily {
    pub day: NaiveDate,
    pub male: u64,
    pub female: u64,
}

impl GenderDaily {
    /// Male/female ratio; undefined (not infinity) when no female sales.
    pub fn ratio(&self) -> Option<f64> {
        if self.female == 0 {
            None
        } else {
            Some(self.male as f64 / self.female as f64)
        }
    }

    /// Total gendered volume for the day (male + female).
    pub fn total(&self) -> u64 {
        self.male + self.female
    }
}

/// The four fixed clock-hour ranges partitioning a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Daypart {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl Daypart {
    pub const ALL: [Daypart; 4] = [
        Daypart::Night,
        Daypart::Morning,
        Daypart::Afternoon,
        Daypart::Evening,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Daypart::Night => "night",
            Daypart::Morning => "morning",
            Daypart::Afternoon => "afternoon",
            Daypart::Evening => "evening",
        }
    }
}

/// How the boundary hours (6, 12, 18) are bucketed.
///
/// The historical behavior uses strict inequalities on both ends, so those
/// hours fall into *no* daypart. That is preserved as the default rather
/// than silently "fixed"; `Inclusive` is the explicit alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Hours 6, 12, and 18 receive no label (historical behavior).
    Strict,
    /// Each boundary hour belongs to the following period
    /// (6 → morning, 12 → afternoon, 18 → evening).
    Inclusive,
}

/// Count and share of total labeled volume for one daypart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaypartShare {
    pub part: Daypart,
    pub count: u64,
    /// `count / labeled`; shares over the four parts sum to 1.0.
    pub share: f64,
}

/// Full daypart breakdown over the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaypartBreakdown {
    /// One entry per daypart, in `Daypart::ALL` order.
    pub shares: Vec<DaypartShare>,
    /// Records that received a label (the percentage denominator).
    pub labeled: u64,
    /// Records whose hour fell on an unbucketed boundary.
    pub unlabeled: u64,
}

/// Terminal plot geometry (character grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotConfig {
    pub width: usize,
    pub height: usize,
}

/// SVG chart geometry in pixels.
///
/// Passed explicitly to every render call; there is no ambient figure-size
/// state anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    /// Significance threshold for reporting the t-test verdict.
    pub alpha: f64,
    /// Expected input file count; informational only, never a precondition.
    pub expected_files: usize,
    pub boundary_mode: BoundaryMode,

    pub plot: bool,
    pub plot_config: PlotConfig,

    /// Export the daily series (day, count, delta) to CSV.
    pub export: Option<PathBuf>,
    /// Write the three SVG charts into this directory.
    pub render_dir: Option<PathBuf>,
    pub chart_size: ChartSize,
}
