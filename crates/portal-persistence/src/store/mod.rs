//! Data-access seams.
//!
//! Every store is synchronous and `Send + Sync`; async callers move calls
//! onto the blocking pool themselves.

mod library;

pub use library::LibraryStore;

use portal_model::{
    AssessmentRecord, College, Resource, ResourceId, Subject, Submission, SubmissionId, User,
    UserId,
};

use crate::error::Result;

/// Resources plus the reference data they are filed under.
pub trait ResourceStore: Send + Sync {
    /// All resources in catalog order.
    fn list_resources(&self) -> Result<Vec<Resource>>;

    /// Fails with `AlreadyExists` if the id is taken.
    fn add_resource(&self, resource: &Resource) -> Result<()>;

    fn delete_resource(&self, id: &ResourceId) -> Result<()>;

    /// Increment the download counter and return the stored value.
    fn record_download(&self, id: &ResourceId) -> Result<u64>;

    fn set_download_url(&self, id: &ResourceId, url: &str) -> Result<()>;

    fn list_subjects(&self) -> Result<Vec<Subject>>;

    fn list_colleges(&self) -> Result<Vec<College>>;

    /// Insert or replace a subject.
    fn add_subject(&self, subject: &Subject) -> Result<()>;

    /// Insert or replace a college.
    fn add_college(&self, college: &College) -> Result<()>;
}

pub trait UserStore: Send + Sync {
    fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Insert or replace a user.
    fn save_user(&self, user: &User) -> Result<()>;

    /// Flip a saved resource for a user. Returns `true` if it is now saved.
    fn toggle_favorite(&self, user: &UserId, resource: &ResourceId) -> Result<bool>;
}

pub trait SubmissionStore: Send + Sync {
    /// Fails with `DuplicateSubmission` if a submission with the same
    /// content hash already exists.
    fn add_submission(&self, submission: &Submission) -> Result<()>;

    fn update_submission(&self, submission: &Submission) -> Result<()>;

    fn delete_submission(&self, id: &SubmissionId) -> Result<()>;

    /// Record an approved `submission`, add `resource` to the catalog and
    /// award `credits` to the submitter, all or nothing.
    fn publish_submission(
        &self,
        submission: &Submission,
        resource: &Resource,
        credits: u32,
    ) -> Result<()>;

    /// All submissions, oldest first.
    fn list_submissions(&self) -> Result<Vec<Submission>>;
}

pub trait AssessmentStore: Send + Sync {
    fn record_assessment(&self, record: &AssessmentRecord) -> Result<()>;

    /// A user's assessments, oldest first.
    fn list_assessments(&self, user: &UserId) -> Result<Vec<AssessmentRecord>>;
}
