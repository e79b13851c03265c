//! Accuracy report of a finished run.

use std::{fmt, io::BufRead, time::Duration};

use tracing::warn;

use crate::{
    Error,
    domain::ScoredResult,
    engine::{StatsSnapshot, percentage},
    output::format_duration,
};

/// Final counts of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub total: u64,
    pub correct: u64,
    pub invalid: u64,
    /// Wall time of the run, unknown when the summary was rebuilt from persisted results
    pub elapsed: Option<Duration>,
}

impl RunSummary {
    pub(crate) fn from_stats(stats: &StatsSnapshot, elapsed: Duration) -> Self {
        Self {
            total: stats.total,
            correct: stats.correct,
            invalid: stats.invalid,
            elapsed: Some(elapsed),
        }
    }

    /// Percentage of correct answers among all processed records.
    pub fn accuracy(&self) -> f64 {
        percentage(self.correct, self.total)
    }

    /// Percentage of correct answers among the records that got a valid answer.
    pub fn valid_accuracy(&self) -> f64 {
        percentage(self.correct, self.total.saturating_sub(self.invalid))
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Samples: {}", self.total)?;
        writeln!(f, "Correct Answers: {}", self.correct)?;
        writeln!(f, "Invalid Answers: {}", self.invalid)?;
        writeln!(f, "Overall Accuracy: {:.2}%", self.accuracy())?;
        writeln!(f, "Accuracy (excluding invalids): {:.2}%", self.valid_accuracy())?;
        if let Some(elapsed) = self.elapsed {
            writeln!(f, "Total Time: {}", format_duration(elapsed.as_secs_f64()))?;
        }
        Ok(())
    }
}

/// Rebuilds the summary of a run from its persisted results stream (one JSON result per line).
///
/// Lines that cannot be decoded are reported and skipped, read failures abort.
pub fn summarize_results(reader: impl BufRead) -> Result<RunSummary, Error> {
    let mut summary = RunSummary {
        total: 0,
        correct: 0,
        invalid: 0,
        elapsed: None,
    };

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let result: ScoredResult = match serde_json::from_str(&line) {
            Ok(result) => result,
            Err(e) => {
                warn!("skipping undecodable result on line {}: {e}", idx + 1);
                continue;
            }
        };
        summary.total += 1;
        if result.is_correct {
            summary.correct += 1;
        }
        if result.is_invalid {
            summary.invalid += 1;
        }
    }

    Ok(summary)
}
