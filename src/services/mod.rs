pub mod completion_client;
pub mod pdf_service;
pub mod prompt_builder;
pub mod question_service;
pub mod response_parser;
pub mod validator;

pub use completion_client::{CompletionClient, OpenAiCompletionClient};
pub use question_service::QuestionService;
