//! Conversion traits between model types and persistence types.
//!
//! Writing a snapshot cannot fail. Reading one can: ids are re-validated
//! through the model constructors and timestamps are re-parsed, so a
//! hand-edited or damaged library surfaces as `InvalidRecord` or
//! `InvalidTimestamp` instead of bad data in the catalog.

use chrono::{DateTime, Utc};
use portal_model::{
    AssessmentId, AssessmentRecord, College, CollegeId, DegreeLevel, Pattern, Resource,
    ResourceId, ResourceType, Subject, SubjectId, Submission, SubmissionId, SubmissionStatus,
    User, UserId,
};

use crate::error::{PersistenceError, Result};
use crate::types::{
    AssessmentSnapshot, CollegeSnapshot, DegreeSnapshot, PatternSnapshot, ResourceSnapshot,
    ResourceTypeSnapshot, StatusSnapshot, SubjectSnapshot, SubmissionSnapshot, UserSnapshot,
};

/// Trait for types that can be converted to a persistence snapshot.
pub trait ToSnapshot {
    /// The snapshot type.
    type Snapshot;

    /// Convert to a snapshot for persistence.
    fn to_snapshot(&self) -> Self::Snapshot;
}

/// Trait for types that can be rebuilt from a persistence snapshot.
pub trait FromSnapshot: Sized {
    /// The snapshot type.
    type Snapshot;

    /// Rebuild from a snapshot, validating as the model would.
    fn from_snapshot(snapshot: &Self::Snapshot) -> Result<Self>;
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| PersistenceError::InvalidTimestamp {
            value: value.to_string(),
        })
}

// =============================================================================
// ENUMS
// =============================================================================

impl From<ResourceType> for ResourceTypeSnapshot {
    fn from(kind: ResourceType) -> Self {
        match kind {
            ResourceType::PastPaper => Self::PastPaper,
            ResourceType::Note => Self::Note,
            ResourceType::Syllabus => Self::Syllabus,
        }
    }
}

impl From<ResourceTypeSnapshot> for ResourceType {
    fn from(snapshot: ResourceTypeSnapshot) -> Self {
        match snapshot {
            ResourceTypeSnapshot::PastPaper => Self::PastPaper,
            ResourceTypeSnapshot::Note => Self::Note,
            ResourceTypeSnapshot::Syllabus => Self::Syllabus,
        }
    }
}

impl From<Pattern> for PatternSnapshot {
    fn from(pattern: Pattern) -> Self {
        match pattern {
            Pattern::OldScheme => Self::OldScheme,
            Pattern::NewScheme => Self::NewScheme,
        }
    }
}

impl From<PatternSnapshot> for Pattern {
    fn from(snapshot: PatternSnapshot) -> Self {
        match snapshot {
            PatternSnapshot::OldScheme => Self::OldScheme,
            PatternSnapshot::NewScheme => Self::NewScheme,
        }
    }
}

impl From<DegreeLevel> for DegreeSnapshot {
    fn from(degree: DegreeLevel) -> Self {
        match degree {
            DegreeLevel::Undergraduate => Self::Undergraduate,
            DegreeLevel::Postgraduate => Self::Postgraduate,
        }
    }
}

impl From<DegreeSnapshot> for DegreeLevel {
    fn from(snapshot: DegreeSnapshot) -> Self {
        match snapshot {
            DegreeSnapshot::Undergraduate => Self::Undergraduate,
            DegreeSnapshot::Postgraduate => Self::Postgraduate,
        }
    }
}

impl From<SubmissionStatus> for StatusSnapshot {
    fn from(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::Pending => Self::Pending,
            SubmissionStatus::Approved => Self::Approved,
            SubmissionStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<StatusSnapshot> for SubmissionStatus {
    fn from(snapshot: StatusSnapshot) -> Self {
        match snapshot {
            StatusSnapshot::Pending => Self::Pending,
            StatusSnapshot::Approved => Self::Approved,
            StatusSnapshot::Rejected => Self::Rejected,
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

impl ToSnapshot for Resource {
    type Snapshot = ResourceSnapshot;

    fn to_snapshot(&self) -> ResourceSnapshot {
        ResourceSnapshot {
            id: self.id.to_string(),
            title: self.title.clone(),
            college_id: self.college_id.to_string(),
            subject_id: self.subject_id.to_string(),
            semester: self.semester,
            year: self.year,
            resource_type: self.resource_type.into(),
            pattern: self.pattern.into(),
            degree_level: self.degree_level.into(),
            download_url: self.download_url.clone(),
            size: self.size.clone(),
            download_count: self.download_count,
            created_at: self.created_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

impl FromSnapshot for Resource {
    type Snapshot = ResourceSnapshot;

    fn from_snapshot(snapshot: &ResourceSnapshot) -> Result<Self> {
        Ok(Self {
            id: ResourceId::new(&snapshot.id)?,
            title: snapshot.title.clone(),
            college_id: CollegeId::new(&snapshot.college_id)?,
            subject_id: SubjectId::new(&snapshot.subject_id)?,
            semester: snapshot.semester,
            year: snapshot.year,
            resource_type: snapshot.resource_type.into(),
            pattern: snapshot.pattern.into(),
            degree_level: snapshot.degree_level.into(),
            download_url: snapshot.download_url.clone(),
            size: snapshot.size.clone(),
            download_count: snapshot.download_count,
            created_at: snapshot
                .created_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
        })
    }
}

impl ToSnapshot for Subject {
    type Snapshot = SubjectSnapshot;

    fn to_snapshot(&self) -> SubjectSnapshot {
        SubjectSnapshot {
            id: self.id.to_string(),
            name: self.name.clone(),
            icon: self.icon.clone(),
        }
    }
}

impl FromSnapshot for Subject {
    type Snapshot = SubjectSnapshot;

    fn from_snapshot(snapshot: &SubjectSnapshot) -> Result<Self> {
        Ok(Self {
            id: SubjectId::new(&snapshot.id)?,
            name: snapshot.name.clone(),
            icon: snapshot.icon.clone(),
        })
    }
}

impl ToSnapshot for College {
    type Snapshot = CollegeSnapshot;

    fn to_snapshot(&self) -> CollegeSnapshot {
        CollegeSnapshot {
            id: self.id.to_string(),
            name: self.name.clone(),
            city: self.city.clone(),
        }
    }
}

impl FromSnapshot for College {
    type Snapshot = CollegeSnapshot;

    fn from_snapshot(snapshot: &CollegeSnapshot) -> Result<Self> {
        Ok(Self {
            id: CollegeId::new(&snapshot.id)?,
            name: snapshot.name.clone(),
            city: snapshot.city.clone(),
        })
    }
}

impl ToSnapshot for User {
    type Snapshot = UserSnapshot;

    fn to_snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id.to_string(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
            credits: self.credits,
            saved_resources: self.saved_resources.iter().map(ToString::to_string).collect(),
        }
    }
}

impl FromSnapshot for User {
    type Snapshot = UserSnapshot;

    fn from_snapshot(snapshot: &UserSnapshot) -> Result<Self> {
        Ok(Self {
            id: UserId::new(&snapshot.id)?,
            display_name: snapshot.display_name.clone(),
            email: snapshot.email.clone(),
            is_admin: snapshot.is_admin,
            credits: snapshot.credits,
            saved_resources: snapshot
                .saved_resources
                .iter()
                .map(ResourceId::new)
                .collect::<std::result::Result<_, _>>()?,
        })
    }
}

impl ToSnapshot for Submission {
    type Snapshot = SubmissionSnapshot;

    fn to_snapshot(&self) -> SubmissionSnapshot {
        SubmissionSnapshot {
            id: self.id.to_string(),
            user_id: self.user_id.to_string(),
            title: self.title.clone(),
            subject_id: self.subject_id.to_string(),
            college_id: self.college_id.to_string(),
            semester: self.semester,
            year: self.year,
            resource_type: self.resource_type.into(),
            pattern: self.pattern.into(),
            degree_level: self.degree_level.into(),
            file_url: self.file_url.clone(),
            size: self.size.clone(),
            content_hash: self.content_hash.clone(),
            status: self.status.into(),
            submitted_at: self.submitted_at.to_rfc3339(),
            review_note: self.review_note.clone(),
        }
    }
}

impl FromSnapshot for Submission {
    type Snapshot = SubmissionSnapshot;

    fn from_snapshot(snapshot: &SubmissionSnapshot) -> Result<Self> {
        Ok(Self {
            id: SubmissionId::new(&snapshot.id)?,
            user_id: UserId::new(&snapshot.user_id)?,
            title: snapshot.title.clone(),
            subject_id: SubjectId::new(&snapshot.subject_id)?,
            college_id: CollegeId::new(&snapshot.college_id)?,
            semester: snapshot.semester,
            year: snapshot.year,
            resource_type: snapshot.resource_type.into(),
            pattern: snapshot.pattern.into(),
            degree_level: snapshot.degree_level.into(),
            file_url: snapshot.file_url.clone(),
            size: snapshot.size.clone(),
            content_hash: snapshot.content_hash.clone(),
            status: snapshot.status.into(),
            submitted_at: parse_timestamp(&snapshot.submitted_at)?,
            review_note: snapshot.review_note.clone(),
        })
    }
}

impl ToSnapshot for AssessmentRecord {
    type Snapshot = AssessmentSnapshot;

    fn to_snapshot(&self) -> AssessmentSnapshot {
        AssessmentSnapshot {
            id: self.id.to_string(),
            user_id: self.user_id.to_string(),
            subject_id: self.subject_id.to_string(),
            semester: self.semester,
            topic: self.topic.clone(),
            score: self.score,
            total: self.total,
            feedback: self.feedback.clone(),
            taken_at: self.taken_at.to_rfc3339(),
        }
    }
}

impl FromSnapshot for AssessmentRecord {
    type Snapshot = AssessmentSnapshot;

    fn from_snapshot(snapshot: &AssessmentSnapshot) -> Result<Self> {
        Ok(Self {
            id: AssessmentId::new(&snapshot.id)?,
            user_id: UserId::new(&snapshot.user_id)?,
            subject_id: SubjectId::new(&snapshot.subject_id)?,
            semester: snapshot.semester,
            topic: snapshot.topic.clone(),
            score: snapshot.score,
            total: snapshot.total,
            feedback: snapshot.feedback.clone(),
            taken_at: parse_timestamp(&snapshot.taken_at)?,
        })
    }
}

/// Rebuild every snapshot in `snapshots`, failing on the first invalid one.
pub(crate) fn restore_all<T: FromSnapshot>(snapshots: &[T::Snapshot]) -> Result<Vec<T>> {
    snapshots.iter().map(T::from_snapshot).collect()
}
