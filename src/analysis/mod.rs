//! Analytical components over the loaded dataset.
//!
//! Each submodule is a pure function of its inputs; the dataset is never
//! mutated after ingest, so the components can run in any order (or not at
//! all) without affecting each other.

pub mod changepoint;
pub mod daily;
pub mod dayparts;
pub mod gender;

pub use changepoint::detect_changepoint;
pub use daily::aggregate_daily;
pub use dayparts::daypart_breakdown;
pub use gender::gender_by_day;
