//! Line-prefix parser for free-text model output.
//!
//! The parser never fails: a missing prefix leaves the matching field empty.
//! Blocks are separated by blank lines; a block that does not open with a
//! question prefix is folded into the previous question.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{
    domain::{Choice, GeneratedQuestion, QuestionType},
    dto::generation::{normalize_option_letter, option_letter},
};

static QUESTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:pertanyaan|soal)\s*(?:no\.?\s*)?(?:\d+\s*[:.)]?|[:.)])\s*(.*)$")
        .expect("QUESTION_RE is a valid regex pattern")
});

static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\s*[.)]\s+(.*)$").expect("NUMBERED_RE is a valid regex pattern")
});

static CHOICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\*?)\s*\(?([A-Ea-e])[.)]\s*(.*)$").expect("CHOICE_RE is a valid regex pattern")
});

static ANSWER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:kunci\s+jawaban|jawaban(?:\s+(?:benar|acuan))?)\s*:\s*(.*)$")
        .expect("ANSWER_RE is a valid regex pattern")
});

static EXPLANATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:penjelasan|pembahasan)\s*:\s*(.*)$")
        .expect("EXPLANATION_RE is a valid regex pattern")
});

static RUBRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:rubrik(?:\s+penilaian)?|kriteria(?:\s+penilaian)?)\s*:\s*(.*)$")
        .expect("RUBRIC_RE is a valid regex pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Question,
    Choice,
    Answer,
    Explanation,
    Rubric,
}

#[derive(Debug, Default)]
struct QuestionDraft {
    question: String,
    choices: Vec<Choice>,
    answer: String,
    explanation: String,
    rubric: String,
}

impl QuestionDraft {
    fn new(question: &str) -> Self {
        QuestionDraft {
            question: question.trim().to_string(),
            ..Default::default()
        }
    }

    fn append(&mut self, field: Field, line: &str) {
        let target = match field {
            Field::Question => &mut self.question,
            Field::Choice => match self.choices.last_mut() {
                Some(choice) => &mut choice.text,
                None => &mut self.question,
            },
            Field::Answer => &mut self.answer,
            Field::Explanation => &mut self.explanation,
            Field::Rubric => &mut self.rubric,
        };
        if !target.is_empty() {
            target.push('\n');
        }
        target.push_str(line);
    }

    fn finish(self, question_type: QuestionType) -> GeneratedQuestion {
        match question_type {
            QuestionType::MultipleChoice => {
                let answer = self.answer.trim();
                let letter = normalize_option_letter(answer).or_else(|| {
                    // "Jawaban: 4" names the choice text instead of its letter
                    self.choices
                        .iter()
                        .find(|c| !answer.is_empty() && c.text.eq_ignore_ascii_case(answer))
                        .map(|c| c.option.clone())
                });

                let choices = self
                    .choices
                    .into_iter()
                    .map(|mut choice| {
                        if letter.as_deref() == Some(choice.option.as_str()) {
                            choice.is_correct = true;
                        }
                        choice
                    })
                    .collect();

                GeneratedQuestion::multiple_choice(self.question, choices, self.explanation)
            }
            QuestionType::Essay => {
                let mut answer = self.answer;
                if !self.explanation.is_empty() {
                    if !answer.is_empty() {
                        answer.push('\n');
                    }
                    answer.push_str(&self.explanation);
                }
                GeneratedQuestion::essay(self.question, answer, self.rubric)
            }
        }
    }
}

/// Returns the question text when `line` opens a new question. Bare `1.`
/// numbering only counts when no `Pertanyaan`/`Soal` prefix is used, so
/// numbered rubric or answer lists stay inside their question.
fn question_start(line: &str, numbered: bool) -> Option<&str> {
    let caps = QUESTION_RE
        .captures(line)
        .or_else(|| numbered.then(|| NUMBERED_RE.captures(line)).flatten())?;
    caps.get(1).map(|m| m.as_str())
}

fn split_blocks(text: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for raw in text.lines() {
        let line = raw.replace("**", "");
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Parses numbered free text into questions of the given type.
pub fn parse_questions(text: &str, question_type: QuestionType) -> Vec<GeneratedQuestion> {
    let blocks = split_blocks(text);
    let numbered = !blocks.iter().flatten().any(|line| QUESTION_RE.is_match(line));
    let has_markers = blocks
        .iter()
        .flatten()
        .any(|line| question_start(line, numbered).is_some());

    let mut drafts: Vec<QuestionDraft> = Vec::new();
    let mut field = Field::Question;

    for block in blocks {
        for line in block {
            if let Some(question) = question_start(&line, numbered) {
                drafts.push(QuestionDraft::new(question));
                field = Field::Question;
                continue;
            }

            let Some(draft) = drafts.last_mut() else {
                // Without any question prefix the first line is the question;
                // with prefixes, lines before the first one are preamble.
                if !has_markers {
                    drafts.push(QuestionDraft::new(&line));
                    field = Field::Question;
                }
                continue;
            };

            if let Some(caps) = ANSWER_RE.captures(&line) {
                draft.answer = caps[1].trim().to_string();
                field = Field::Answer;
            } else if let Some(caps) = EXPLANATION_RE.captures(&line) {
                draft.explanation = caps[1].trim().to_string();
                field = Field::Explanation;
            } else if let Some(caps) = RUBRIC_RE.captures(&line) {
                draft.rubric = caps[1].trim().to_string();
                field = Field::Rubric;
            } else if question_type == QuestionType::MultipleChoice && CHOICE_RE.is_match(&line) {
                if let Some(caps) = CHOICE_RE.captures(&line) {
                    let raw_text = &caps[3];
                    let starred = !caps[1].is_empty() || raw_text.contains('*');
                    let option = normalize_option_letter(&caps[2])
                        .unwrap_or_else(|| option_letter(draft.choices.len()));
                    draft.choices.push(Choice {
                        option,
                        text: raw_text.replace('*', "").trim().to_string(),
                        is_correct: starred,
                    });
                    field = Field::Choice;
                }
            } else {
                draft.append(field, &line);
            }
        }
    }

    drafts
        .into_iter()
        .map(|draft| draft.finish(question_type))
        .collect()
}
