//! Module defining the parsing logic used to turn a dataset file into the records fed to the workers.

use std::io::Read;

use serde::Deserialize;
use tracing::warn;

use crate::domain::Record;
use crate::error::Error;


pub(crate) const REQUIRED_COLUMNS: [&str; 5] = ["premise", "choice1", "choice2", "question", "label"];

/// Validates the header of the dataset and returns a lazy iterator over its records, in file order.
///
/// A missing column is fatal and reported before any record is read. The first malformed row ends the
/// iteration: the rows after it are never read.
pub fn parse_records(reader: impl Read) -> Result<impl Iterator<Item = Record>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(Error::MissingColumn(missing));
    }

    let records = csv_reader
        .into_deserialize::<RawRecord>()
        .enumerate()
        .map(|(idx, result)| {
            let raw = result?;
            raw.into_record(idx as u64 + 1)
        })
        .map_while(|result| match result {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("stopped reading the dataset: {e}");
                None
            }
        });

    Ok(records)
}

// Intermediate type mirroring the CSV columns; extra columns are ignored
#[derive(Deserialize)]
struct RawRecord {
    premise: String,
    choice1: String,
    choice2: String,
    question: String,
    label: String,
}

impl RawRecord {
    fn into_record(self, row: u64) -> Result<Record, Error> {
        let RawRecord {
            premise,
            choice1,
            choice2,
            question,
            label,
        } = self;
        Record::new(premise, choice1, choice2, question, &label)
            .map_err(|message| Error::InvalidRecord { row, message })
    }
}
