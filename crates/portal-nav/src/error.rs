//! Navigation error types.

use portal_model::ModelError;
use thiserror::Error;

use crate::selection::Field;
use crate::view::View;

/// Why a navigation event was refused or could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// An earlier drill-down choice has not been made yet.
    #[error("cannot open {target}: no {missing} selected yet")]
    MissingSelection { target: View, missing: Field },

    /// Semester beyond what the selected pattern/degree offers.
    #[error("semester {semester} is not offered (valid: 1-{max})")]
    SemesterOutOfRange { semester: u8, max: u8 },

    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("unknown view: {0}")]
    UnknownView(String),

    #[error("invalid navigation event: {0}")]
    InvalidEvent(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl NavError {
    /// Short message for a transient notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingSelection { missing, .. } => {
                format!("Please choose a {missing} first.")
            }
            Self::SemesterOutOfRange { max, .. } => {
                format!("Pick a semester between 1 and {max}.")
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
