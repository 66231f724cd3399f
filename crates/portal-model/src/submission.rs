//! Student paper submissions awaiting moderation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{DegreeLevel, Pattern, ResourceType, SubmissionStatus};
use crate::error::{ModelError, Result};
use crate::ids::{CollegeId, ResourceId, SubjectId, SubmissionId, UserId};
use crate::resource::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub title: String,
    pub subject_id: SubjectId,
    pub college_id: CollegeId,
    pub semester: u8,
    pub year: u16,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub pattern: Pattern,
    pub degree_level: DegreeLevel,
    pub file_url: String,
    pub size: String,
    /// SHA-256 of the uploaded file, used to spot duplicate uploads.
    #[serde(default)]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub review_note: Option<String>,
}

impl Submission {
    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }

    /// Mark as approved. Fails if a moderator already decided.
    pub fn approve(&mut self, note: Option<String>) -> Result<()> {
        self.review(SubmissionStatus::Approved, note)
    }

    /// Mark as rejected. Fails if a moderator already decided.
    pub fn reject(&mut self, note: Option<String>) -> Result<()> {
        self.review(SubmissionStatus::Rejected, note)
    }

    fn review(&mut self, status: SubmissionStatus, note: Option<String>) -> Result<()> {
        if self.status.is_reviewed() {
            return Err(ModelError::AlreadyReviewed(self.id.to_string()));
        }
        self.status = status;
        self.review_note = note;
        Ok(())
    }

    /// Build the library resource published when this submission is approved.
    pub fn to_resource(&self, id: ResourceId, created_at: DateTime<Utc>) -> Resource {
        Resource {
            id,
            title: self.title.clone(),
            college_id: self.college_id.clone(),
            subject_id: self.subject_id.clone(),
            semester: self.semester,
            year: self.year,
            resource_type: self.resource_type,
            pattern: self.pattern,
            degree_level: self.degree_level,
            download_url: self.file_url.clone(),
            size: self.size.clone(),
            download_count: 0,
            created_at: Some(created_at),
        }
    }
}
