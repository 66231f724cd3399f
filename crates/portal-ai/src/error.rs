//! Error types for the study assistant.

use portal_model::ModelError;
use thiserror::Error;

/// Errors that can occur while talking to the hosted model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    /// The assistant is switched off in settings.
    #[error("AI assistant is disabled")]
    Disabled,

    /// The API key environment variable is not set.
    #[error("API key not found in environment variable {var}")]
    MissingApiKey { var: String },

    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with an error status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// The reply did not contain what was asked for.
    #[error("unusable model reply: {0}")]
    InvalidResponse(String),

    /// Failed to parse JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Answers and questions do not pair up.
    #[error("{answers} answers given for {questions} questions")]
    AnswerCountMismatch { questions: usize, answers: usize },

    /// The parsed result failed model validation.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl AiError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Disabled => "The study assistant is turned off.",
            Self::MissingApiKey { .. } => {
                "The study assistant is not configured. Set an API key to use it."
            }
            Self::Network(_) => {
                "Could not reach the study assistant. Please check your internet connection."
            }
            Self::RateLimited { .. } => {
                "The study assistant is busy right now. Please try again later."
            }
            Self::AnswerCountMismatch { .. } => "Please answer every question before submitting.",
            Self::Api { .. }
            | Self::InvalidResponse(_)
            | Self::JsonParse(_)
            | Self::Model(_) => "The study assistant gave an unexpected answer. Please try again.",
        }
    }

    /// Returns whether this error is potentially recoverable with a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited { .. } | Self::InvalidResponse(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AiError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for assistant operations.
pub type Result<T> = std::result::Result<T, AiError>;
