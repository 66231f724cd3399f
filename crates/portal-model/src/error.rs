use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid {kind} id: {value:?}")]
    InvalidId { kind: &'static str, value: String },
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
    #[error("unknown pattern: {0}")]
    UnknownPattern(String),
    #[error("unknown degree level: {0}")]
    UnknownDegreeLevel(String),
    #[error("unknown submission status: {0}")]
    UnknownSubmissionStatus(String),
    #[error("score {score} exceeds total {total}")]
    ScoreExceedsTotal { score: u32, total: u32 },
    #[error("submission {0} has already been reviewed")]
    AlreadyReviewed(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
