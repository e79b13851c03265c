//! Module for the core of the engine: the concurrent evaluation pipeline

mod collector;
mod orchestration;
mod stats;
mod worker;


pub use orchestration::run_pipeline;
pub(crate) use stats::{RunStats, StatsSnapshot, percentage};
