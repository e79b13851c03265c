//! Choices, model answers and the extraction of an answer from free-text completions.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder used when no choice can be extracted from a completion or the inference call failed.
pub const INVALID_ANSWER: &str = "[invalid]";

static ANSWER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(A|B)\b").expect("answer pattern is a valid regex"));

/// One of the two options offered by every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl Choice {
    /// Maps the dataset label onto the option it marks as correct: `"0"` is `A`, `"1"` is `B`.
    pub(crate) fn from_label(label: &str) -> Result<Self, String> {
        match label {
            "0" => Ok(Choice::A),
            "1" => Ok(Choice::B),
            other => Err(format!("label must be \"0\" or \"1\", got {other:?}")),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The answer extracted from a model completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Answer {
    Choice(Choice),
    Invalid,
}

impl Answer {
    pub fn is_invalid(self) -> bool {
        matches!(self, Answer::Invalid)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Choice(choice) => choice.fmt(f),
            Answer::Invalid => f.write_str(INVALID_ANSWER),
        }
    }
}

impl From<Answer> for String {
    fn from(answer: Answer) -> Self {
        answer.to_string()
    }
}

impl TryFrom<String> for Answer {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "A" => Ok(Answer::Choice(Choice::A)),
            "B" => Ok(Answer::Choice(Choice::B)),
            INVALID_ANSWER => Ok(Answer::Invalid),
            other => Err(format!("unknown answer {other:?}")),
        }
    }
}

/// Returns the first standalone `A` or `B` token anywhere in the completion.
pub(crate) fn extract_answer(completion: &str) -> Answer {
    match ANSWER_PATTERN.find(completion.trim()).map(|m| m.as_str()) {
        Some("A") => Answer::Choice(Choice::A),
        Some("B") => Answer::Choice(Choice::B),
        _ => Answer::Invalid,
    }
}
