//! Payloads exchanged with the model through tool calls.
//!
//! The JSON schemas handed to the provider are derived from these types, so the
//! arguments the model sends back deserialize straight into them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::{Choice, GeneratedQuestion, ValidationOutcome};

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ChoicePayload {
    /// Choice letter: "A", "B", "C" or "D".
    pub option: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MultipleChoicePayload {
    pub question: String,
    pub choices: Vec<ChoicePayload>,
    /// Letter of the single correct choice.
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct EssayPayload {
    pub question: String,
    /// Reference answer.
    pub answer: String,
    /// Grading rubric.
    #[serde(default)]
    pub rubric: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MultipleChoiceSet {
    pub questions: Vec<MultipleChoicePayload>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct EssaySet {
    pub questions: Vec<EssayPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerdictKind {
    Accept,
    Reject,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct VerdictPayload {
    pub verdict: VerdictKind,
    /// Short reasons, in Bahasa Indonesia.
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Reduces "B", "b.", "(B)" or "B. 4" to "B".
pub fn normalize_option_letter(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('(');
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let boundary = chars.next().map_or(true, |c| !c.is_alphanumeric());
    (first.is_ascii_alphabetic() && boundary).then(|| first.to_ascii_uppercase().to_string())
}

impl From<MultipleChoicePayload> for GeneratedQuestion {
    fn from(payload: MultipleChoicePayload) -> Self {
        let correct = normalize_option_letter(&payload.correct_answer);
        let choices = payload
            .choices
            .into_iter()
            .enumerate()
            .map(|(index, choice)| {
                let option = normalize_option_letter(&choice.option)
                    .unwrap_or_else(|| option_letter(index));
                Choice {
                    is_correct: correct.as_deref() == Some(option.as_str()),
                    option,
                    text: choice.text.trim().to_string(),
                }
            })
            .collect();

        GeneratedQuestion::multiple_choice(
            payload.question.trim(),
            choices,
            payload.explanation.trim(),
        )
    }
}

impl From<EssayPayload> for GeneratedQuestion {
    fn from(payload: EssayPayload) -> Self {
        GeneratedQuestion::essay(
            payload.question.trim(),
            payload.answer.trim(),
            payload.rubric.trim(),
        )
    }
}

impl From<VerdictPayload> for ValidationOutcome {
    fn from(payload: VerdictPayload) -> Self {
        match payload.verdict {
            VerdictKind::Accept => ValidationOutcome::Accepted {
                reasons: payload.reasons,
            },
            VerdictKind::Reject => ValidationOutcome::Rejected {
                reasons: payload.reasons,
            },
        }
    }
}

pub fn option_letter(index: usize) -> String {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i).to_string())
        .unwrap_or_else(|| (index + 1).to_string())
}
