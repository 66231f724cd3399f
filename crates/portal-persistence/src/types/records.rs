//! Record snapshots.
//!
//! Timestamps are stored as RFC 3339 strings.

use rkyv::{Archive, Deserialize, Serialize};

use super::{DegreeSnapshot, PatternSnapshot, ResourceTypeSnapshot, StatusSnapshot};

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub struct ResourceSnapshot {
    pub id: String,
    pub title: String,
    pub college_id: String,
    pub subject_id: String,
    pub semester: u8,
    pub year: u16,
    pub resource_type: ResourceTypeSnapshot,
    pub pattern: PatternSnapshot,
    pub degree_level: DegreeSnapshot,
    pub download_url: String,
    pub size: String,
    pub download_count: u64,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub struct SubjectSnapshot {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub struct CollegeSnapshot {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub struct UserSnapshot {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub credits: u32,
    /// Saved resource ids in sorted order.
    pub saved_resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub struct SubmissionSnapshot {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub subject_id: String,
    pub college_id: String,
    pub semester: u8,
    pub year: u16,
    pub resource_type: ResourceTypeSnapshot,
    pub pattern: PatternSnapshot,
    pub degree_level: DegreeSnapshot,
    pub file_url: String,
    pub size: String,
    pub content_hash: Option<String>,
    pub status: StatusSnapshot,
    pub submitted_at: String,
    pub review_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub struct AssessmentSnapshot {
    pub id: String,
    pub user_id: String,
    pub subject_id: String,
    pub semester: u8,
    pub topic: String,
    pub score: u32,
    pub total: u32,
    pub feedback: String,
    pub taken_at: String,
}
