//! Module defining the boundary to the model answering the questions.

mod http;


pub use http::{DEFAULT_ENDPOINT, HttpModel, InferenceConfig};

use crate::{Error, domain::SYSTEM_PROMPT};

pub const TEMPERATURE: f64 = 0.7;
pub const TOP_P: f64 = 0.9;

/// One completion request as handed to a [`Model`].
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f64,
    pub top_p: f64,
}

impl InferenceRequest {
    pub(crate) fn new(prompt: String) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            prompt,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

/// A model completing prompts. `complete` blocks the calling worker until the answer (or an error) arrives.
///
/// Shared by reference between all workers of a run, hence `Sync`. Closures with the matching signature
/// are models too, which keeps stubbing simple.
pub trait Model: Sync {
    fn complete(&self, request: &InferenceRequest) -> Result<String, Error>;
}

impl<F> Model for F
where
    F: Fn(&InferenceRequest) -> Result<String, Error> + Sync,
{
    fn complete(&self, request: &InferenceRequest) -> Result<String, Error> {
        self(request)
    }
}
