//! Session error types.

use portal_ai::AiError;
use portal_model::{ModelError, UserId};
use portal_nav::NavError;
use portal_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation needs a logged-in user.
    #[error("you need to be logged in to {operation}")]
    LoginRequired { operation: &'static str },

    /// The operation is reserved for administrators.
    #[error("only administrators can {operation}")]
    NotAuthorized { operation: &'static str },

    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("resource already exists: {0}")]
    DuplicateResource(String),

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No assistant was configured for this session.
    #[error("the study assistant is not available")]
    AiUnavailable,

    #[error(transparent)]
    Nav(#[from] NavError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl SessionError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Message suitable for showing to the student.
    pub fn user_message(&self) -> String {
        match self {
            Self::Nav(err) => err.user_message(),
            Self::Persistence(err) => err.user_message(),
            Self::Ai(err) => err.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
