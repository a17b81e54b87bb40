use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;
use crate::models::domain::{ExamRequest, QuestionType};

pub const MISSING_FIELDS_MESSAGE: &str = "Subjek dan tingkat pendidikan harus disertakan.";

/// Raw body of `POST /generate-question(s)`, JSON or multipart fields.
///
/// Everything is optional here so that missing fields produce our own 400
/// message instead of a deserializer error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateQuestionsRequestDto {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub num_questions: Option<u32>,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateQuestionsRequestDto {
    /// Checks subject and level are present and non-blank.
    pub fn ensure_required(&self) -> Result<(), AppError> {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        if present(&self.subject) && present(&self.level) {
            Ok(())
        } else {
            Err(AppError::InputError(MISSING_FIELDS_MESSAGE.to_string()))
        }
    }

    /// Sets a field from a multipart text part. Unknown names are ignored.
    pub fn set_form_field(&mut self, name: &str, value: String) -> Result<(), AppError> {
        match name {
            "subject" => self.subject = Some(value),
            "level" => self.level = Some(value),
            "question_type" => self.question_type = Some(value),
            "text" => self.text = Some(value),
            "num_questions" => {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    let parsed = trimmed.parse::<u32>().map_err(|_| {
                        AppError::InputError(format!(
                            "num_questions harus berupa bilangan bulat positif, diterima '{}'",
                            trimmed
                        ))
                    })?;
                    self.num_questions = Some(parsed);
                }
            }
            other => log::debug!("Ignoring unknown form field '{}'", other),
        }
        Ok(())
    }
}

impl TryFrom<GenerateQuestionsRequestDto> for ExamRequest {
    type Error = AppError;

    fn try_from(dto: GenerateQuestionsRequestDto) -> Result<Self, Self::Error> {
        dto.ensure_required()?;

        let question_type = match dto.question_type.as_deref().map(str::trim) {
            None | Some("") => QuestionType::default(),
            Some(raw) => raw.parse::<QuestionType>().map_err(AppError::InputError)?,
        };

        let mut request = ExamRequest::new(
            dto.subject.as_deref().unwrap_or_default(),
            dto.level.as_deref().unwrap_or_default(),
            dto.num_questions.unwrap_or(1),
            question_type,
        );
        if let Some(text) = dto.text {
            request = request.with_context(text);
        }

        request.validate()?;
        Ok(request)
    }
}
