//! Few-shot prompt construction.

use rand::{Rng, seq::SliceRandom};

use crate::domain::{Choice, Record};

pub(crate) const SYSTEM_PROMPT: &str =
    "You are an expert assistant. Provide the correct answer (A or B) directly without explanation.";

struct Exemplar {
    activity_name: &'static str,
    premise: &'static str,
    choices: [&'static str; 2],
    question: &'static str,
    answer: Choice,
}

const EXEMPLARS: [Exemplar; 4] = [
    Exemplar {
        activity_name: "going grocery shopping",
        premise: "select items from the shelf",
        choices: ["pay at the counter", "leave the store without paying"],
        question: "effect",
        answer: Choice::A,
    },
    Exemplar {
        activity_name: "baking a cake",
        premise: "mix the batter",
        choices: ["burn the kitchen", "pour batter into a pan"],
        question: "effect",
        answer: Choice::B,
    },
    Exemplar {
        activity_name: "riding on a bus",
        premise: "board the bus",
        choices: ["buy a ticket", "fly to another city"],
        question: "cause",
        answer: Choice::A,
    },
    Exemplar {
        activity_name: "planting a tree",
        premise: "dig a hole",
        choices: ["water the plant", "cut down a tree"],
        question: "effect",
        answer: Choice::A,
    },
];

/// Builds the user prompt for a record: `n_shot` demonstrations followed by the record's question.
#[derive(Debug, Clone)]
pub(crate) struct PromptBuilder {
    activity_name: String,
    n_shot: usize,
}

impl PromptBuilder {
    pub(crate) fn new(activity_name: impl Into<String>, n_shot: usize) -> Self {
        Self {
            activity_name: activity_name.into(),
            n_shot,
        }
    }

    /// The demonstrations are reshuffled on every call, so two prompts for the same record may differ.
    pub(crate) fn build(&self, record: &Record, rng: &mut impl Rng) -> String {
        let mut demos: Vec<&Exemplar> = EXEMPLARS.iter().collect();
        demos.shuffle(rng);

        let mut prompt = String::new();
        for demo in demos.into_iter().take(self.n_shot) {
            prompt.push_str(&question_text(
                demo.activity_name,
                demo.premise,
                demo.choices,
                demo.question,
            ));
            prompt.push(' ');
            prompt.push_str(demo.answer.as_str());
            prompt.push_str("\n\n");
        }
        prompt.push_str(&question_text(
            &self.activity_name,
            record.premise(),
            record.choices(),
            record.question(),
        ));
        prompt
    }
}

fn question_text(activity_name: &str, premise: &str, choices: [&str; 2], question: &str) -> String {
    format!(
        "The following are multiple choice questions about '{activity_name}'. \
         You should directly answer the question by choosing the correct option.\n\
         Which of the following events (given as options A or B) is a plausible {question} of the event '{premise}'?\n\
         A. {}\nB. {}\nAnswer:",
        choices[0], choices[1]
    )
}
