//! Module defining the errors which are exposed to the users of the crate

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unreadable or malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset header lacks one of the columns every record needs
    #[error("dataset header is missing the required column `{0}`")]
    MissingColumn(&'static str),

    /// Row decoded fine but its content cannot form a record, e.g., a label other than 0/1
    #[error("invalid record at row {row}: {message}")]
    InvalidRecord { row: u64, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level failure talking to the inference endpoint
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The inference endpoint answered, but not with a usable completion
    #[error("inference error: {0}")]
    Inference(String),
}

pub(crate) fn inference_error(message: impl Into<String>) -> Error {
    Error::Inference(message.into())
}
