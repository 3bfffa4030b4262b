//! Synthetic dataset generation.

pub mod sample;
