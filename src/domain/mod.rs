//! Module for the types defining the evaluation domain.

mod answer;
mod prompt;
mod record;


pub use answer::{Answer, Choice, INVALID_ANSWER};
pub(crate) use answer::extract_answer;
pub(crate) use prompt::{PromptBuilder, SYSTEM_PROMPT};
pub use record::{Record, ScoredResult};
