//! Downloadable resources and the reference data they point at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{DegreeLevel, Pattern, ResourceType};
use crate::ids::{CollegeId, ResourceId, SubjectId};

/// A downloadable academic document.
///
/// Only `download_count` and `download_url` change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub college_id: CollegeId,
    pub subject_id: SubjectId,
    /// 1-based semester number.
    pub semester: u8,
    pub year: u16,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub pattern: Pattern,
    pub degree_level: DegreeLevel,
    pub download_url: String,
    /// Display string such as "1.2 MB".
    pub size: String,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource {
    /// Increment the download counter and return the new value.
    pub fn record_download(&mut self) -> u64 {
        self.download_count = self.download_count.saturating_add(1);
        self.download_count
    }
}

/// A subject students can drill into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    /// Icon token for the subject card.
    #[serde(default)]
    pub icon: Option<String>,
}

impl Subject {
    pub fn new(id: SubjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: None,
        }
    }
}

/// A college whose papers are catalogued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub id: CollegeId,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
}

impl College {
    pub fn new(id: CollegeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            city: None,
        }
    }
}
