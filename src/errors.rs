use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Missing or invalid request field.
    #[error("{0}")]
    InputError(String),

    /// The LLM provider failed or returned something we could not use.
    #[error("{0}")]
    UpstreamError(String),

    /// Every attempt was rejected by the validator.
    #[error("Soal yang dihasilkan tidak valid setelah {0} kali percobaan. Silakan coba lagi.")]
    ValidationExhausted(u32),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InputError(_) => "INPUT_ERROR",
            AppError::UpstreamError(_) => "UPSTREAM_ERROR",
            AppError::ValidationExhausted(_) => "VALIDATION_EXHAUSTED",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InputError(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamError(_)
            | AppError::ValidationExhausted(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InputError(err.to_string())
    }
}

impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::UpstreamError(format!("LLM provider error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::UpstreamError(format!("Malformed LLM payload: {}", err))
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::InputError(format!("Gagal membaca form multipart: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
