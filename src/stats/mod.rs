//! Statistical routines.

pub mod ttest;

pub use ttest::one_sample_ttest;
