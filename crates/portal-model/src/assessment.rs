//! AI-generated assessments and their results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::{AssessmentId, SubjectId, UserId};

/// One generated question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 1-based position within the assessment.
    pub number: u32,
    pub text: String,
    pub marks: u32,
}

/// Grading outcome for a set of answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u32,
    pub total: u32,
    pub feedback: String,
}

impl Evaluation {
    pub fn new(score: u32, total: u32, feedback: impl Into<String>) -> Result<Self> {
        if score > total {
            return Err(ModelError::ScoreExceedsTotal { score, total });
        }
        Ok(Self {
            score,
            total,
            feedback: feedback.into(),
        })
    }

    /// Score as a percentage; zero when there was nothing to score.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.score) * 100.0 / f64::from(self.total)
        }
    }
}

/// A completed assessment, listed in the assessment-history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub user_id: UserId,
    pub subject_id: SubjectId,
    pub semester: u8,
    pub topic: String,
    pub score: u32,
    pub total: u32,
    pub feedback: String,
    pub taken_at: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn from_evaluation(
        user_id: UserId,
        subject_id: SubjectId,
        semester: u8,
        topic: impl Into<String>,
        evaluation: &Evaluation,
    ) -> Self {
        Self {
            id: AssessmentId::generate(),
            user_id,
            subject_id,
            semester,
            topic: topic.into(),
            score: evaluation.score,
            total: evaluation.total,
            feedback: evaluation.feedback.clone(),
            taken_at: Utc::now(),
        }
    }
}

/// Sum of marks across questions.
pub fn total_marks(questions: &[Question]) -> u32 {
    questions.iter().map(|q| q.marks).sum()
}
