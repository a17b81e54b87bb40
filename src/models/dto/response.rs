use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{ExamRequest, GeneratedQuestion, QuestionType};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateQuestionsResponseDto {
    pub subject: String,
    pub level: String,
    pub question_type: QuestionType,
    pub questions: Vec<GeneratedQuestion>,
    pub generated_at: DateTime<Utc>,
}

impl GenerateQuestionsResponseDto {
    pub fn new(request: ExamRequest, questions: Vec<GeneratedQuestion>) -> Self {
        GenerateQuestionsResponseDto {
            subject: request.subject,
            level: request.level,
            question_type: request.question_type,
            questions,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let request = ExamRequest::new("Sejarah", "SMA", 1, QuestionType::Essay);
        let questions = vec![GeneratedQuestion::essay("Kapan?", "1945", "").with_attempts(1)];

        let json = serde_json::to_value(GenerateQuestionsResponseDto::new(request, questions)).unwrap();

        assert_eq!(json["subject"], "Sejarah");
        assert_eq!(json["level"], "SMA");
        assert_eq!(json["question_type"], "essay");
        assert_eq!(json["questions"].as_array().map(Vec::len), Some(1));
        assert!(json["generated_at"].is_string());
    }
}
