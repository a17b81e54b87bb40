use std::sync::Arc;

use crate::{
    config::Config,
    services::{CompletionClient, OpenAiCompletionClient, QuestionService},
};

#[derive(Clone)]
pub struct AppState {
    pub question_service: Arc<QuestionService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client: Arc<dyn CompletionClient> = Arc::new(OpenAiCompletionClient::new(&config));
        Self::with_client(config, client)
    }

    /// Builds the state around any completion client, e.g. a test double.
    pub fn with_client(config: Config, client: Arc<dyn CompletionClient>) -> Self {
        log::info!(
            "Using model {} (generation: {}, validation: {})",
            config.llm_model,
            config.generation_mode,
            config.validation_mode
        );

        let question_service = Arc::new(QuestionService::new(client, &config));

        Self {
            question_service,
            config: Arc::new(config),
        }
    }
}
