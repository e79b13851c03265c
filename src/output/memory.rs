use crate::{
    Error,
    domain::ScoredResult,
    output::{ProgressSnapshot, ResultSink},
};

/// Sink keeping everything in memory, batch boundaries included.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub batches: Vec<Vec<ScoredResult>>,
    pub snapshots: Vec<ProgressSnapshot>,
}

impl MemorySink {
    /// All persisted results in persistence order.
    pub fn results(&self) -> impl Iterator<Item = &ScoredResult> {
        self.batches.iter().flatten()
    }
}

impl ResultSink for MemorySink {
    fn write_results(&mut self, batch: &[ScoredResult]) -> Result<(), Error> {
        self.batches.push(batch.to_vec());
        Ok(())
    }

    fn write_progress(&mut self, snapshot: &ProgressSnapshot) -> Result<(), Error> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }
}
