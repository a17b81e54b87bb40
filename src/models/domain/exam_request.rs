use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MAX_QUESTIONS_PER_REQUEST: u32 = 20;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    Essay,
}

impl QuestionType {
    /// Name used inside Indonesian prompts.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "pilihan ganda",
            QuestionType::Essay => "esai",
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "multiple_choice" | "pilihan_ganda" | "pg" => Ok(QuestionType::MultipleChoice),
            "essay" | "esai" | "essai" => Ok(QuestionType::Essay),
            _ => Err(format!(
                "Jenis soal '{}' tidak dikenal. Pilih dari: 'pilihan ganda' atau 'essay'.",
                s.trim()
            )),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple_choice"),
            QuestionType::Essay => write!(f, "essay"),
        }
    }
}

/// A validated generation request. Lives for one HTTP request.
#[derive(Clone, Debug, PartialEq, Validate)]
pub struct ExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    #[validate(length(min = 1, max = 200))]
    pub level: String,

    #[validate(range(min = 1, max = 20))]
    pub num_questions: u32,

    pub question_type: QuestionType,

    /// Typed text or text extracted from an uploaded PDF.
    pub context: Option<String>,
}

impl ExamRequest {
    pub fn new(subject: &str, level: &str, num_questions: u32, question_type: QuestionType) -> Self {
        ExamRequest {
            subject: subject.trim().to_string(),
            level: level.trim().to_string(),
            num_questions,
            question_type,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = if context.trim().is_empty() {
            None
        } else {
            Some(context)
        };
        self
    }
}
