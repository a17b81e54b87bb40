use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Choice {
    pub option: String, // "A", "B", ...
    pub text: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionBody {
    MultipleChoice {
        choices: Vec<Choice>,
        correct_answer: Option<String>,
        explanation: String,
    },
    Essay {
        answer: String,
        rubric: String,
    },
}

/// One question in a response. Identity is its position in the list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratedQuestion {
    pub question: String,
    #[serde(flatten)]
    pub body: QuestionBody,
    /// Attempt on which the validator accepted this question.
    pub attempts: u32,
}

impl GeneratedQuestion {
    pub fn multiple_choice(
        question: impl Into<String>,
        choices: Vec<Choice>,
        explanation: impl Into<String>,
    ) -> Self {
        let correct_answer = choices
            .iter()
            .find(|choice| choice.is_correct)
            .map(|choice| choice.option.clone());

        GeneratedQuestion {
            question: question.into(),
            body: QuestionBody::MultipleChoice {
                choices,
                correct_answer,
                explanation: explanation.into(),
            },
            attempts: 0,
        }
    }

    pub fn essay(
        question: impl Into<String>,
        answer: impl Into<String>,
        rubric: impl Into<String>,
    ) -> Self {
        GeneratedQuestion {
            question: question.into(),
            body: QuestionBody::Essay {
                answer: answer.into(),
                rubric: rubric.into(),
            },
            attempts: 0,
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn choices(&self) -> &[Choice] {
        match &self.body {
            QuestionBody::MultipleChoice { choices, .. } => choices,
            QuestionBody::Essay { .. } => &[],
        }
    }

    /// Renders the question in the same numbered layout the text prompts ask
    /// for, so the validator sees identical input in both generation modes.
    pub fn render_text(&self) -> String {
        let mut out = format!("Pertanyaan: {}", self.question);
        match &self.body {
            QuestionBody::MultipleChoice {
                choices,
                correct_answer,
                explanation,
            } => {
                for choice in choices {
                    out.push_str(&format!("\n{}. {}", choice.option, choice.text));
                }
                if let Some(answer) = correct_answer {
                    out.push_str(&format!("\nJawaban: {}", answer));
                }
                if !explanation.is_empty() {
                    out.push_str(&format!("\nPenjelasan: {}", explanation));
                }
            }
            QuestionBody::Essay { answer, rubric } => {
                if !answer.is_empty() {
                    out.push_str(&format!("\nJawaban: {}", answer));
                }
                if !rubric.is_empty() {
                    out.push_str(&format!("\nRubrik: {}", rubric));
                }
            }
        }
        out
    }
}
