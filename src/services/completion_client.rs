use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// One chat turn: a fixed system instruction plus the built prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A function the model is forced to call; `parameters` is a JSON schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Parsed JSON arguments of the forced tool call.
    Arguments(Value),
    /// The model ignored the tool and answered in prose.
    Text(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<String>;

    async fn complete_with_tool(
        &self,
        request: &CompletionRequest,
        tool: &ToolDefinition,
    ) -> AppResult<ToolOutput>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    #[serde(default)]
    choices: Vec<ChatChoiceBody>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceBody {
    message: ChatMessageBody,
}

#[derive(Debug, Deserialize)]
struct ChatMessageBody {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallBody>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallBody {
    function: FunctionCallBody,
}

#[derive(Debug, Deserialize)]
struct FunctionCallBody {
    name: String,
    arguments: String,
}

/// Chat-completions client for any OpenAI-compatible provider (Groq by default).
pub struct OpenAiCompletionClient {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiCompletionClient {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.llm_api_key.expose_secret())
            .with_api_base(config.llm_api_base.clone());

        Self {
            client: Client::with_config(openai_config),
            model: config.llm_model.clone(),
            timeout: Duration::from_secs(config.llm_timeout_secs),
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }

    async fn send(&self, body: Value) -> AppResult<ChatMessageBody> {
        let response: ChatCompletionBody =
            tokio::time::timeout(self.timeout, self.client.chat().create_byot(body))
                .await
                .map_err(|_| {
                    AppError::UpstreamError(format!(
                        "LLM request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                })??;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AppError::UpstreamError("LLM returned no choices".to_string()))
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<String> {
        log::debug!("Sending completion request to model {}", self.model);
        let message = self.send(self.request_body(request)).await?;

        let content = message.content.unwrap_or_default().trim().to_string();
        if content.is_empty() {
            return Err(AppError::UpstreamError(
                "LLM returned an empty response".to_string(),
            ));
        }
        Ok(content)
    }

    async fn complete_with_tool(
        &self,
        request: &CompletionRequest,
        tool: &ToolDefinition,
    ) -> AppResult<ToolOutput> {
        log::debug!(
            "Sending tool completion request ({}) to model {}",
            tool.name,
            self.model
        );

        let mut body = self.request_body(request);
        body["tools"] = json!([{
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.parameters,
            }
        }]);
        body["tool_choice"] = json!({
            "type": "function",
            "function": { "name": tool.name }
        });

        let message = self.send(body).await?;
        let call = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .find(|call| call.function.name == tool.name);

        match call {
            Some(call) => {
                let arguments: Value = serde_json::from_str(&call.function.arguments)?;
                Ok(ToolOutput::Arguments(arguments))
            }
            None => {
                let text = message.content.unwrap_or_default().trim().to_string();
                if text.is_empty() {
                    Err(AppError::UpstreamError(format!(
                        "LLM did not call tool '{}'",
                        tool.name
                    )))
                } else {
                    log::warn!("LLM answered in prose instead of calling '{}'", tool.name);
                    Ok(ToolOutput::Text(text))
                }
            }
        }
    }
}
