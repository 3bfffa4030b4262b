//! Formatted terminal output for the analysis report.

pub mod format;

pub use format::*;
