//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the model
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<LlmError> },
}

impl LlmError {
    /// HTTP status behind this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::RateLimited { .. } => Some(429),
            LlmError::Api { status, .. } => Some(*status),
            LlmError::Network(e) => e.status().map(|s| s.as_u16()),
            LlmError::RetriesExhausted { last, .. } => last.status(),
            LlmError::InvalidResponse(_) | LlmError::Json(_) => None,
        }
    }

    /// Whether another attempt may succeed, given the retryable status set
    pub fn is_retryable(&self, retryable_statuses: &[u16]) -> bool {
        match self {
            LlmError::RateLimited { .. } | LlmError::Api { .. } => self
                .status()
                .map(|s| retryable_statuses.contains(&s))
                .unwrap_or(false),
            LlmError::Network(e) => e
                .status()
                .map(|s| retryable_statuses.contains(&s.as_u16()))
                .unwrap_or(true),
            LlmError::InvalidResponse(_) | LlmError::Json(_) | LlmError::RetriesExhausted { .. } => {
                false
            }
        }
    }

    /// Server-provided wait, if this is a rate limit error
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
