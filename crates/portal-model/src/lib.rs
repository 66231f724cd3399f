//! Data model for the study resource portal.
//!
//! Resources, the reference data they are filed under (subjects, colleges),
//! users, submissions and assessment results. Everything here is plain data
//! with serde support; persistence and navigation live in their own crates.

pub mod assessment;
pub mod enums;
pub mod error;
pub mod ids;
pub mod resource;
pub mod submission;
pub mod user;

pub use assessment::{AssessmentRecord, Evaluation, Question, total_marks};
pub use enums::{
    DegreeLevel, Pattern, ResourceType, SubmissionStatus, max_semester, semester_options,
};
pub use error::{ModelError, Result};
pub use ids::{AssessmentId, CollegeId, ResourceId, SubjectId, SubmissionId, UserId};
pub use resource::{College, Resource, Subject};
pub use submission::Submission;
pub use user::User;
