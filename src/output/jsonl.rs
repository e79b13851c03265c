//! File-backed sink writing one JSON document per line.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::{
    Error,
    domain::ScoredResult,
    output::{ProgressSnapshot, ResultSink},
};

pub const RESULTS_FILE: &str = "results.jsonl";
pub const PROGRESS_FILE: &str = "progress.jsonl";

/// Writes the results stream and the progress stream into two files of one directory.
#[derive(Debug)]
pub struct JsonlSink {
    results: BufWriter<File>,
    progress: BufWriter<File>,
}

impl JsonlSink {
    /// Creates the directory if needed. Files left over from an earlier run are truncated.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            results: BufWriter::new(File::create(dir.join(RESULTS_FILE))?),
            progress: BufWriter::new(File::create(dir.join(PROGRESS_FILE))?),
        })
    }
}

impl ResultSink for JsonlSink {
    fn write_results(&mut self, batch: &[ScoredResult]) -> Result<(), Error> {
        for result in batch {
            write_line(&mut self.results, result)?;
        }
        self.results.flush()?;
        Ok(())
    }

    fn write_progress(&mut self, snapshot: &ProgressSnapshot) -> Result<(), Error> {
        write_line(&mut self.progress, snapshot)?;
        self.progress.flush()?;
        Ok(())
    }
}

fn write_line(writer: &mut impl Write, value: &impl Serialize) -> Result<(), Error> {
    serde_json::to_writer(&mut *writer, value)?;
    writer.write_all(b"\n")?;
    Ok(())
}
