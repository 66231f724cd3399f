//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;

use portal_model::ModelError;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid file format (not a .spl file).
    #[error("Invalid library file format")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Unsupported schema version.
    #[error("Library file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Serialization error.
    #[error("Failed to serialize library data")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Deserialization error.
    #[error("Failed to deserialize library data")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored record no longer passes model validation.
    #[error("Stored record is invalid")]
    InvalidRecord(#[from] ModelError),

    /// A stored timestamp could not be parsed.
    #[error("Stored timestamp is invalid: {value}")]
    InvalidTimestamp { value: String },

    /// The addressed record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A record with the same id already exists.
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: &'static str, id: String },

    /// The same file was already submitted.
    #[error("File already submitted as {existing}")]
    DuplicateSubmission {
        content_hash: String,
        existing: String,
    },
}

impl PersistenceError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidFormat { path, reason } => {
                format!(
                    "The file at {} is not a valid library file: {}",
                    path.display(),
                    reason
                )
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => {
                format!(
                    "This library file was written by a newer version of the portal \
                    (file version {}, your version supports up to {}).",
                    found, max_supported
                )
            }
            Self::Serialization { .. } => {
                "An error occurred while saving the library data.".to_string()
            }
            Self::Deserialization { .. } => {
                "An error occurred while reading the library data. The file may be corrupted."
                    .to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::InvalidRecord(source) => {
                format!("The library contains an invalid record: {source}")
            }
            Self::InvalidTimestamp { value } => {
                format!("The library contains an unreadable timestamp '{value}'.")
            }
            Self::NotFound { kind, id } => format!("No {kind} with id '{id}' exists."),
            Self::AlreadyExists { kind, id } => format!("A {kind} with id '{id}' already exists."),
            Self::DuplicateSubmission { existing, .. } => {
                format!("This file has already been submitted (submission {existing}).")
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } => {
                Some("Make sure the library path points at a .spl file.".into())
            }
            Self::UnsupportedVersion { .. } => Some("Update the portal to the latest version.".into()),
            Self::Deserialization { .. } | Self::InvalidRecord(_) | Self::InvalidTimestamp { .. } => {
                Some("Restore the library from a backup or run `portal init` on a new path.".into())
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or save the library to a different location.".into())
            }
            Self::DuplicateSubmission { .. } => {
                Some("Wait for the existing submission to be reviewed.".into())
            }
            Self::Serialization { .. } | Self::NotFound { .. } | Self::AlreadyExists { .. } => None,
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
