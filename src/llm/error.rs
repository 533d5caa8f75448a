//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Build the error for a non-success HTTP status
    pub fn from_status(status: u16, retry_after: Option<&str>, body: String) -> Self {
        if status == 429 {
            let retry_after = retry_after.and_then(|s| s.parse::<u64>().ok()).unwrap_or(60);
            return LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            };
        }
        LlmError::ApiError { status, message: body }
    }
}
