//! Module defining the dataset record and the verdict produced for it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{Answer, Choice, extract_answer};

/// One dataset row: a premise, two candidate events and the relation asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    premise: String,
    choice1: String,
    choice2: String,
    question: String,
    correct: Choice,
}

impl Record {
    pub fn new(
        premise: impl Into<String>,
        choice1: impl Into<String>,
        choice2: impl Into<String>,
        question: impl Into<String>,
        label: &str,
    ) -> Result<Self, String> {
        Ok(Self {
            premise: premise.into(),
            choice1: choice1.into(),
            choice2: choice2.into(),
            question: question.into(),
            correct: Choice::from_label(label)?,
        })
    }

    pub fn premise(&self) -> &str {
        &self.premise
    }

    pub fn choices(&self) -> [&str; 2] {
        [&self.choice1, &self.choice2]
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn correct(&self) -> Choice {
        self.correct
    }
}

/// Public DTO holding the verdict for one processed record, as persisted in the results stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScoredResult {
    pub premise: String,
    pub choice1: String,
    pub choice2: String,
    pub causal_question: String,
    pub correct_answer: Choice,
    pub model_answer: Answer,
    pub model_completion: String,
    pub is_correct: bool,
    pub is_invalid: bool,
    /// Seconds spent on the record, including the inference call
    pub processing_time: f64,
}

impl ScoredResult {
    /// Scores a completion against the record it was produced for.
    pub(crate) fn score(record: Record, completion: String, processing_time: Duration) -> Self {
        let model_answer = extract_answer(&completion);
        let Record {
            premise,
            choice1,
            choice2,
            question,
            correct,
        } = record;

        Self {
            premise,
            choice1,
            choice2,
            causal_question: question,
            correct_answer: correct,
            model_answer,
            model_completion: completion,
            is_correct: model_answer == Answer::Choice(correct),
            is_invalid: model_answer.is_invalid(),
            processing_time: processing_time.as_secs_f64(),
        }
    }
}
