//! Root library file type.

use chrono::{DateTime, Utc};
use rkyv::{Archive, Deserialize, Serialize};

use super::{
    AssessmentSnapshot, CollegeSnapshot, ResourceSnapshot, SubjectSnapshot, SubmissionSnapshot,
    UserSnapshot,
};

/// Root library structure.
///
/// This is the top-level type that gets serialized to .spl files.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub struct LibraryFile {
    /// Schema version (for future migrations).
    pub schema_version: u32,

    /// When the library was created.
    pub created_at: String,

    /// When the library was last saved.
    pub last_saved_at: String,

    /// Resources in catalog order.
    pub resources: Vec<ResourceSnapshot>,

    pub subjects: Vec<SubjectSnapshot>,

    pub colleges: Vec<CollegeSnapshot>,

    pub users: Vec<UserSnapshot>,

    /// Submissions in the order they arrived.
    pub submissions: Vec<SubmissionSnapshot>,

    pub assessments: Vec<AssessmentSnapshot>,
}

impl Default for LibraryFile {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryFile {
    /// Create an empty library.
    pub fn new() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            schema_version: super::CURRENT_SCHEMA_VERSION,
            created_at: now.clone(),
            last_saved_at: now,
            resources: Vec::new(),
            subjects: Vec::new(),
            colleges: Vec::new(),
            users: Vec::new(),
            submissions: Vec::new(),
            assessments: Vec::new(),
        }
    }

    /// Update the last saved timestamp.
    pub fn touch(&mut self) {
        self.last_saved_at = Utc::now().to_rfc3339();
    }

    /// Parse the last_saved_at timestamp.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.last_saved_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub(crate) fn resource_index(&self, id: &str) -> Option<usize> {
        self.resources.iter().position(|r| r.id == id)
    }

    pub(crate) fn user_index(&self, id: &str) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }

    pub(crate) fn submission_index(&self, id: &str) -> Option<usize> {
        self.submissions.iter().position(|s| s.id == id)
    }
}
