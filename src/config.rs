use std::{env, fmt, str::FromStr};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

/// How questions are requested from the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationMode {
    /// Ask for a `submit_questions` tool call matching a JSON schema.
    Structured,
    /// Ask for numbered free text and run it through the line-prefix parser.
    Text,
}

/// How the validator's reply is turned into a verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    /// Ask for a `submit_verdict` tool call.
    Structured,
    /// Search the free-text reply for "sudah sesuai" / "benar".
    Keyword,
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structured" | "tool" => Ok(GenerationMode::Structured),
            "text" | "free_text" => Ok(GenerationMode::Text),
            other => Err(format!("unknown generation mode '{}'", other)),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structured" | "tool" => Ok(ValidationMode::Structured),
            "keyword" | "text" => Ok(ValidationMode::Keyword),
            other => Err(format!("unknown validation mode '{}'", other)),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Structured => write!(f, "structured"),
            GenerationMode::Text => write!(f, "text"),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Structured => write!(f, "structured"),
            ValidationMode::Keyword => write!(f, "keyword"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub llm_api_key: SecretString,
    pub llm_api_base: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    pub llm_timeout_secs: u64,
    pub generation_mode: GenerationMode,
    pub validation_mode: ValidationMode,
    pub max_context_chars: usize,
    pub max_upload_bytes: usize,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_server_port: parse_env("WEB_SERVER_PORT", 5000),
            llm_api_key: SecretString::from(
                env::var("LLM_API_KEY")
                    .or_else(|_| env::var("GROQ_API_KEY"))
                    .or_else(|_| env::var("OPENAI_API_KEY"))
                    .unwrap_or_default(),
            ),
            llm_api_base: env::var("LLM_API_BASE")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            llm_model: env::var("LLM_MODEL")
                .unwrap_or_else(|_| "llama3-groq-70b-8192-tool-use-preview".to_string()),
            llm_temperature: parse_env("LLM_TEMPERATURE", 0.7),
            llm_max_tokens: parse_env("LLM_MAX_TOKENS", 1024),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 60),
            generation_mode: parse_env("GENERATION_MODE", GenerationMode::Structured),
            validation_mode: parse_env("VALIDATION_MODE", ValidationMode::Structured),
            max_context_chars: parse_env("MAX_CONTEXT_CHARS", 12_000),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
        }
    }

    /// Fails when the provider credentials are missing.
    pub fn validate_for_production(&self) -> AppResult<()> {
        if self.llm_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::InternalError(
                "LLM_API_KEY is not set. Set LLM_API_KEY (or GROQ_API_KEY / OPENAI_API_KEY)."
                    .to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(AppError::InternalError(format!(
                "LLM_TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.llm_temperature
            )));
        }

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        !self.llm_api_key.expose_secret().trim().is_empty()
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 5000,
            llm_api_key: SecretString::from("test_api_key".to_string()),
            llm_api_base: "http://localhost:9999/v1".to_string(),
            llm_model: "test-model".to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: 300,
            llm_timeout_secs: 5,
            generation_mode: GenerationMode::Text,
            validation_mode: ValidationMode::Keyword,
            max_context_chars: 200,
            max_upload_bytes: 1024,
            cors_allowed_origin: None,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid value '{}' for {}", raw, key);
            default
        }),
        Err(_) => default,
    }
}
