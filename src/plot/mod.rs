//! Plot rendering: terminal ASCII plots and optional SVG chart exports.

pub mod ascii;
pub mod charts;

pub use ascii::{render_daily_trend, render_daypart_bars, render_gender_trend};
