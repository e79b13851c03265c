//! Run-scope configuration of the pipeline.

use std::time::Duration;

pub const DEFAULT_WORKER_COUNT: usize = 50;
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_N_SHOT: usize = 4;
pub const DEFAULT_EXPECTED_TOTAL: u64 = 3_500_000;
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_ACTIVITY_NAME: &str = "going grocery shopping";

/// Knobs of one evaluation run.
///
/// Worker count and batch size are clamped to at least one, the progress interval to at least a millisecond.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    worker_count: usize,
    batch_size: usize,
    n_shot: usize,
    expected_total: u64,
    progress_interval: Duration,
    intake_capacity: Option<usize>,
    output_capacity: Option<usize>,
    activity_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
            n_shot: DEFAULT_N_SHOT,
            expected_total: DEFAULT_EXPECTED_TOTAL,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            intake_capacity: None,
            output_capacity: None,
            activity_name: DEFAULT_ACTIVITY_NAME.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Number of demonstrations put in front of every question.
    pub fn with_n_shot(mut self, n_shot: usize) -> Self {
        self.n_shot = n_shot;
        self
    }

    /// Dataset size assumed by the ETA; it is never checked against the real dataset.
    pub fn with_expected_total(mut self, expected_total: u64) -> Self {
        self.expected_total = expected_total;
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: Duration) -> Self {
        self.progress_interval = progress_interval.max(Duration::from_millis(1));
        self
    }

    /// Records buffered between the feeder and the workers. Defaults to the worker count.
    pub fn with_intake_capacity(mut self, capacity: usize) -> Self {
        self.intake_capacity = Some(capacity);
        self
    }

    /// Results buffered between the workers and the collector. Defaults to the batch size.
    pub fn with_output_capacity(mut self, capacity: usize) -> Self {
        self.output_capacity = Some(capacity);
        self
    }

    /// Activity the dataset questions are about, as named in the prompt.
    pub fn with_activity_name(mut self, activity_name: impl Into<String>) -> Self {
        self.activity_name = activity_name.into();
        self
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn n_shot(&self) -> usize {
        self.n_shot
    }

    pub fn expected_total(&self) -> u64 {
        self.expected_total
    }

    pub fn progress_interval(&self) -> Duration {
        self.progress_interval
    }

    pub fn intake_capacity(&self) -> usize {
        self.intake_capacity.unwrap_or(self.worker_count)
    }

    pub fn output_capacity(&self) -> usize {
        self.output_capacity.unwrap_or(self.batch_size)
    }

    pub fn activity_name(&self) -> &str {
        &self.activity_name
    }
}
