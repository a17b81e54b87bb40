use std::sync::Arc;

use crate::{
    config::{Config, GenerationMode},
    constants::prompts::GENERATOR_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
    models::{
        domain::{ExamRequest, GeneratedQuestion, QuestionType},
        dto::generation::{EssaySet, MultipleChoiceSet},
    },
    services::{
        completion_client::{CompletionClient, CompletionRequest, ToolOutput},
        prompt_builder::{build_generation_prompt, build_question_tool, PromptInput},
        response_parser::parse_questions,
        validator::Validator,
    },
};

/// Generate + validate cycles allowed per question.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub mode: GenerationMode,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_context_chars: usize,
}

impl From<&Config> for GenerationSettings {
    fn from(config: &Config) -> Self {
        GenerationSettings {
            mode: config.generation_mode,
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            max_context_chars: config.max_context_chars,
        }
    }
}

/// A candidate question plus the text the validator is shown.
#[derive(Debug, Clone)]
struct Draft {
    question: GeneratedQuestion,
    review_text: String,
}

pub struct QuestionService {
    client: Arc<dyn CompletionClient>,
    validator: Validator,
    settings: GenerationSettings,
}

impl QuestionService {
    pub fn new(client: Arc<dyn CompletionClient>, config: &Config) -> Self {
        let validator = Validator::new(
            Arc::clone(&client),
            config.validation_mode,
            config.llm_temperature,
            config.llm_max_tokens,
        );

        Self {
            client,
            validator,
            settings: GenerationSettings::from(config),
        }
    }

    /// Generates `num_questions` questions one at a time. The first failure
    /// fails the whole batch.
    pub async fn generate_exam(&self, request: &ExamRequest) -> AppResult<Vec<GeneratedQuestion>> {
        let mut questions: Vec<GeneratedQuestion> =
            Vec::with_capacity(request.num_questions as usize);
        let mut asked: Vec<String> = Vec::new();

        for number in 1..=request.num_questions {
            let question = self
                .generate_and_validate(request, number, &asked)
                .await?;
            asked.push(question.question.clone());
            questions.push(question);
        }

        log::info!(
            "Generated {} {} question(s) for '{}' ({})",
            questions.len(),
            request.question_type,
            request.subject,
            request.level
        );
        Ok(questions)
    }

    /// Runs the generate → validate loop for one question. Upstream errors
    /// abort immediately; rejections retry until `MAX_ATTEMPTS`.
    pub async fn generate_and_validate(
        &self,
        request: &ExamRequest,
        number: u32,
        asked: &[String],
    ) -> AppResult<GeneratedQuestion> {
        for attempt in 1..=MAX_ATTEMPTS {
            let draft = self.generate(request, asked).await?;
            let outcome = self.validator.validate(request, &draft.review_text).await?;

            if outcome.is_accepted() {
                log::info!(
                    "Question {} accepted on attempt {}/{}",
                    number,
                    attempt,
                    MAX_ATTEMPTS
                );
                return Ok(draft.question.with_attempts(attempt));
            }

            log::warn!(
                "Question {} rejected on attempt {}/{}: {}",
                number,
                attempt,
                MAX_ATTEMPTS,
                outcome.reasons().join("; ")
            );
        }

        log::error!(
            "Question {} still rejected after {} attempts",
            number,
            MAX_ATTEMPTS
        );
        Err(AppError::ValidationExhausted(MAX_ATTEMPTS))
    }

    async fn generate(&self, request: &ExamRequest, asked: &[String]) -> AppResult<Draft> {
        let structured = self.settings.mode == GenerationMode::Structured;
        let prompt = build_generation_prompt(
            &PromptInput::from_request(request, 1, self.settings.max_context_chars)
                .avoiding(asked)
                .structured(structured),
        );
        let completion = CompletionRequest {
            system: GENERATOR_SYSTEM_PROMPT.to_string(),
            user: prompt,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        if structured {
            let tool = build_question_tool(request.question_type);
            match self.client.complete_with_tool(&completion, &tool).await? {
                ToolOutput::Arguments(arguments) => {
                    let question = first_structured_question(request.question_type, arguments)?;
                    Ok(Draft {
                        review_text: question.render_text(),
                        question,
                    })
                }
                ToolOutput::Text(text) => Self::draft_from_text(request.question_type, text),
            }
        } else {
            let text = self.client.complete(&completion).await?;
            Self::draft_from_text(request.question_type, text)
        }
    }

    fn draft_from_text(question_type: QuestionType, text: String) -> AppResult<Draft> {
        let question = parse_questions(&text, question_type)
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::UpstreamError("LLM response did not contain a question".to_string())
            })?;

        Ok(Draft {
            question,
            review_text: text,
        })
    }
}

fn first_structured_question(
    question_type: QuestionType,
    arguments: serde_json::Value,
) -> AppResult<GeneratedQuestion> {
    let question = match question_type {
        QuestionType::MultipleChoice => serde_json::from_value::<MultipleChoiceSet>(arguments)?
            .questions
            .into_iter()
            .next()
            .map(GeneratedQuestion::from),
        QuestionType::Essay => serde_json::from_value::<EssaySet>(arguments)?
            .questions
            .into_iter()
            .next()
            .map(GeneratedQuestion::from),
    };

    question.ok_or_else(|| {
        AppError::UpstreamError("LLM tool call contained no questions".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ValidationMode,
        constants::prompts::{QUESTION_TOOL_NAME, VALIDATOR_SYSTEM_PROMPT, VERDICT_TOOL_NAME},
        models::domain::QuestionBody,
        services::completion_client::MockCompletionClient,
        test_utils::fixtures::{essay_reply, exam_request, multiple_choice_reply},
    };
    use serde_json::json;

    fn is_generation(req: &CompletionRequest) -> bool {
        req.system == GENERATOR_SYSTEM_PROMPT
    }

    fn is_validation(req: &CompletionRequest) -> bool {
        req.system == VALIDATOR_SYSTEM_PROMPT
    }

    fn text_service(client: MockCompletionClient) -> QuestionService {
        let config = Config::test_config();
        QuestionService::new(Arc::new(client), &config)
    }

    #[actix_rt::test]
    async fn accepts_on_first_attempt() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(is_generation)
            .times(1)
            .returning(|_| Ok(multiple_choice_reply()));
        client
            .expect_complete()
            .withf(is_validation)
            .times(1)
            .returning(|_| Ok("Soal ini sudah sesuai.".to_string()));

        let service = text_service(client);
        let question = service
            .generate_and_validate(&exam_request(1), 1, &[])
            .await
            .unwrap();

        assert_eq!(question.attempts, 1);
        assert_eq!(question.question, "2+2?");
        assert!(question.choices()[1].is_correct);
    }

    #[actix_rt::test]
    async fn tidak_benar_reply_is_accepted_without_retry() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(is_generation)
            .times(1)
            .returning(|_| Ok(multiple_choice_reply()));
        client
            .expect_complete()
            .withf(is_validation)
            .times(1)
            .returning(|_| Ok("Jawaban pada soal ini tidak benar.".to_string()));

        let service = text_service(client);
        let question = service
            .generate_and_validate(&exam_request(1), 1, &[])
            .await
            .unwrap();

        assert_eq!(question.attempts, 1);
    }

    #[actix_rt::test]
    async fn retries_until_accepted() {
        let mut client = MockCompletionClient::new();
        let mut seq = mockall::Sequence::new();
        for reply in ["Ada kesalahan pada pilihan C.", "Soal sudah sesuai."] {
            client
                .expect_complete()
                .withf(is_generation)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(multiple_choice_reply()));
            client
                .expect_complete()
                .withf(is_validation)
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(reply.to_string()));
        }

        let service = text_service(client);
        let question = service
            .generate_and_validate(&exam_request(1), 1, &[])
            .await
            .unwrap();

        assert_eq!(question.attempts, 2);
    }

    #[actix_rt::test]
    async fn never_exceeds_max_attempts() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(is_generation)
            .times(MAX_ATTEMPTS as usize)
            .returning(|_| Ok(multiple_choice_reply()));
        client
            .expect_complete()
            .withf(is_validation)
            .times(MAX_ATTEMPTS as usize)
            .returning(|_| Ok("Pilihan jawaban ganda, perlu diperbaiki.".to_string()));

        let service = text_service(client);
        let err = service
            .generate_and_validate(&exam_request(1), 1, &[])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationExhausted(MAX_ATTEMPTS)));
    }

    #[actix_rt::test]
    async fn upstream_error_aborts_without_retry() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(is_generation)
            .times(1)
            .returning(|_| Err(AppError::UpstreamError("401 Unauthorized".to_string())));

        let service = text_service(client);
        let err = service
            .generate_and_validate(&exam_request(1), 1, &[])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "401 Unauthorized");
    }

    #[actix_rt::test]
    async fn generate_exam_returns_requested_count_and_avoids_repeats() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|req| is_generation(req) && !req.user.contains("Jangan mengulang"))
            .times(1)
            .returning(|_| Ok(multiple_choice_reply()));
        client
            .expect_complete()
            .withf(|req| is_generation(req) && req.user.contains("- 2+2?"))
            .times(2)
            .returning(|_| Ok(multiple_choice_reply()));
        client
            .expect_complete()
            .withf(is_validation)
            .times(3)
            .returning(|_| Ok("Sudah benar.".to_string()));

        let service = text_service(client);
        let questions = service.generate_exam(&exam_request(3)).await.unwrap();

        assert_eq!(questions.len(), 3);
    }

    #[actix_rt::test]
    async fn essay_text_mode_parses_answer_and_rubric() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(is_generation)
            .returning(|_| Ok(essay_reply()));
        client
            .expect_complete()
            .withf(is_validation)
            .returning(|_| Ok("Sudah sesuai.".to_string()));

        let mut request = exam_request(1);
        request.question_type = QuestionType::Essay;
        let question = text_service(client)
            .generate_and_validate(&request, 1, &[])
            .await
            .unwrap();

        match question.body {
            QuestionBody::Essay { answer, rubric } => {
                assert!(answer.contains("klorofil"));
                assert!(!rubric.is_empty());
            }
            QuestionBody::MultipleChoice { .. } => panic!("expected essay"),
        }
    }

    #[actix_rt::test]
    async fn structured_modes_use_tool_calls() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete_with_tool()
            .withf(|_, tool| tool.name == QUESTION_TOOL_NAME)
            .times(1)
            .returning(|_, _| {
                Ok(ToolOutput::Arguments(json!({
                    "questions": [{
                        "question": "Planet terbesar?",
                        "choices": [
                            {"option": "A", "text": "Mars"},
                            {"option": "B", "text": "Jupiter"},
                            {"option": "C", "text": "Venus"},
                            {"option": "D", "text": "Bumi"}
                        ],
                        "correct_answer": "B",
                        "explanation": "Jupiter adalah planet terbesar."
                    }]
                })))
            });
        client
            .expect_complete_with_tool()
            .withf(|req, tool| tool.name == VERDICT_TOOL_NAME && req.user.contains("Jupiter"))
            .times(1)
            .returning(|_, _| Ok(ToolOutput::Arguments(json!({"verdict": "accept"}))));
        client.expect_complete().never();

        let mut config = Config::test_config();
        config.generation_mode = GenerationMode::Structured;
        config.validation_mode = ValidationMode::Structured;
        let service = QuestionService::new(Arc::new(client), &config);

        let question = service
            .generate_and_validate(&exam_request(1), 1, &[])
            .await
            .unwrap();

        assert_eq!(question.question, "Planet terbesar?");
        assert!(question.choices()[1].is_correct);
        assert_eq!(question.attempts, 1);
    }

    #[actix_rt::test]
    async fn structured_payload_without_questions_is_upstream_error() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete_with_tool()
            .returning(|_, _| Ok(ToolOutput::Arguments(json!({"questions": []}))));

        let mut config = Config::test_config();
        config.generation_mode = GenerationMode::Structured;
        let service = QuestionService::new(Arc::new(client), &config);

        let err = service
            .generate_and_validate(&exam_request(1), 1, &[])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamError(_)));
    }
}
