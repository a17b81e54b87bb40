use std::sync::Arc;

use crate::{
    config::ValidationMode,
    constants::prompts::VALIDATOR_SYSTEM_PROMPT,
    errors::AppResult,
    models::{
        domain::{ExamRequest, ValidationOutcome},
        dto::generation::VerdictPayload,
    },
    services::{
        completion_client::{CompletionClient, CompletionRequest, ToolOutput},
        prompt_builder::{build_validation_prompt, build_verdict_tool},
    },
};

const ACCEPT_KEYWORDS: [&str; 2] = ["sudah sesuai", "benar"];

/// Keyword verdict over the validator's free text.
///
/// Any reply containing "sudah sesuai" or "benar" is accepted, which includes
/// "tidak benar". Only used in `ValidationMode::Keyword` and as the fallback
/// when the model ignores the verdict tool.
pub fn keyword_verdict(reply: &str) -> ValidationOutcome {
    let lowered = reply.to_lowercase();
    match ACCEPT_KEYWORDS.iter().find(|keyword| lowered.contains(*keyword)) {
        Some(keyword) => ValidationOutcome::Accepted {
            reasons: vec![format!("balasan validator memuat \"{}\"", keyword)],
        },
        None => ValidationOutcome::Rejected {
            reasons: vec![reply.trim().to_string()],
        },
    }
}

/// Second LLM call that judges a generated question.
pub struct Validator {
    client: Arc<dyn CompletionClient>,
    mode: ValidationMode,
    temperature: f32,
    max_tokens: u32,
}

impl Validator {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        mode: ValidationMode,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            mode,
            temperature,
            max_tokens,
        }
    }

    pub async fn validate(
        &self,
        request: &ExamRequest,
        generated: &str,
    ) -> AppResult<ValidationOutcome> {
        let completion = CompletionRequest {
            system: VALIDATOR_SYSTEM_PROMPT.to_string(),
            user: build_validation_prompt(request, generated, self.mode),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match self.mode {
            ValidationMode::Keyword => {
                let reply = self.client.complete(&completion).await?;
                Ok(keyword_verdict(&reply))
            }
            ValidationMode::Structured => {
                match self
                    .client
                    .complete_with_tool(&completion, &build_verdict_tool())
                    .await?
                {
                    ToolOutput::Arguments(arguments) => {
                        let payload: VerdictPayload = serde_json::from_value(arguments)?;
                        Ok(payload.into())
                    }
                    ToolOutput::Text(reply) => Ok(keyword_verdict(&reply)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::prompts::VERDICT_TOOL_NAME,
        errors::AppError,
        models::domain::QuestionType,
        services::completion_client::MockCompletionClient,
    };
    use serde_json::json;

    fn request() -> ExamRequest {
        ExamRequest::new("Matematika", "SD Kelas 3", 1, QuestionType::MultipleChoice)
    }

    #[test]
    fn keyword_verdict_accepts_sudah_sesuai() {
        assert!(keyword_verdict("Soal ini SUDAH SESUAI dengan jenjangnya.").is_accepted());
    }

    #[test]
    fn keyword_verdict_accepts_tidak_benar() {
        // Known false accept: "tidak benar" contains "benar".
        assert!(keyword_verdict("Kunci jawaban tidak benar.").is_accepted());
    }

    #[test]
    fn keyword_verdict_rejects_other_replies() {
        let outcome = keyword_verdict("Pilihan C dan D sama, perlu diperbaiki.");

        assert!(!outcome.is_accepted());
        assert_eq!(
            outcome.reasons(),
            ["Pilihan C dan D sama, perlu diperbaiki.".to_string()]
        );
    }

    #[actix_rt::test]
    async fn keyword_mode_uses_plain_completion() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|req| req.system == VALIDATOR_SYSTEM_PROMPT && req.user.contains("2+2?"))
            .times(1)
            .returning(|_| Ok("Soal sudah benar.".to_string()));
        client.expect_complete_with_tool().never();

        let validator = Validator::new(Arc::new(client), ValidationMode::Keyword, 0.7, 300);
        let outcome = validator.validate(&request(), "Pertanyaan: 2+2?").await.unwrap();

        assert!(outcome.is_accepted());
    }

    #[actix_rt::test]
    async fn structured_mode_reads_verdict_tool_arguments() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete_with_tool()
            .withf(|_, tool| tool.name == VERDICT_TOOL_NAME)
            .times(1)
            .returning(|_, _| {
                Ok(ToolOutput::Arguments(json!({
                    "verdict": "reject",
                    "reasons": ["Jawaban B salah"]
                })))
            });

        let validator = Validator::new(Arc::new(client), ValidationMode::Structured, 0.7, 300);
        let outcome = validator.validate(&request(), "Pertanyaan: 2+2?").await.unwrap();

        assert_eq!(
            outcome,
            ValidationOutcome::Rejected {
                reasons: vec!["Jawaban B salah".to_string()]
            }
        );
    }

    #[actix_rt::test]
    async fn structured_mode_falls_back_to_keywords_on_prose() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete_with_tool()
            .returning(|_, _| Ok(ToolOutput::Text("Sudah sesuai.".to_string())));

        let validator = Validator::new(Arc::new(client), ValidationMode::Structured, 0.7, 300);
        let outcome = validator.validate(&request(), "Pertanyaan: 2+2?").await.unwrap();

        assert!(outcome.is_accepted());
    }

    #[actix_rt::test]
    async fn structured_mode_malformed_arguments_is_upstream_error() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete_with_tool()
            .returning(|_, _| Ok(ToolOutput::Arguments(json!({"verdict": 42}))));

        let validator = Validator::new(Arc::new(client), ValidationMode::Structured, 0.7, 300);
        let err = validator
            .validate(&request(), "Pertanyaan: 2+2?")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamError(_)));
    }
}
