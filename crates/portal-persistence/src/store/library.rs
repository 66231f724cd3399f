//! `LibraryStore`: every store backed by one `LibraryFile`.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use portal_model::{
    AssessmentRecord, College, Resource, ResourceId, Subject, Submission, SubmissionId, User,
    UserId,
};
use tracing::{debug, info};

use super::{AssessmentStore, ResourceStore, SubmissionStore, UserStore};
use crate::convert::{FromSnapshot, ToSnapshot, restore_all};
use crate::error::{PersistenceError, Result};
use crate::io::{load_library, load_library_async, save_library};
use crate::types::LibraryFile;

/// In-memory library, optionally mirrored to a `.spl` file.
///
/// File-backed stores write through: each mutation is applied to a copy of
/// the library, saved atomically, and only then becomes visible. A failed
/// save leaves both the file and the in-memory state unchanged.
#[derive(Debug)]
pub struct LibraryStore {
    library: Mutex<LibraryFile>,
    path: Option<PathBuf>,
}

impl LibraryStore {
    /// Empty store that never touches disk.
    pub fn in_memory() -> Self {
        Self::from_library(LibraryFile::new(), None)
    }

    /// Open the library at `path`, starting empty if it does not exist yet.
    ///
    /// The file is created by the first write.
    pub fn open(path: &Path) -> Result<Self> {
        let library = if path.exists() {
            load_library(path)?
        } else {
            info!(path = %path.display(), "library file not found, starting empty");
            LibraryFile::new()
        };
        Ok(Self::from_library(library, Some(path.to_path_buf())))
    }

    /// `open` with the file read on the blocking pool.
    pub async fn open_async(path: PathBuf) -> Result<Self> {
        let library = if path.exists() {
            load_library_async(path.clone()).await?
        } else {
            info!(path = %path.display(), "library file not found, starting empty");
            LibraryFile::new()
        };
        Ok(Self::from_library(library, Some(path)))
    }

    /// Create a fresh library file at `path`, replacing any existing one.
    pub fn create(path: &Path) -> Result<Self> {
        let mut library = LibraryFile::new();
        save_library(&mut library, path)?;
        Ok(Self::from_library(library, Some(path.to_path_buf())))
    }

    pub fn from_library(library: LibraryFile, path: Option<PathBuf>) -> Self {
        Self {
            library: Mutex::new(library),
            path,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy of the current library contents.
    pub fn snapshot(&self) -> LibraryFile {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, LibraryFile> {
        // A panic while holding the lock cannot leave a half-applied change:
        // mutations only ever swap in a fully built copy.
        self.library.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, f: impl FnOnce(&LibraryFile) -> Result<T>) -> Result<T> {
        f(&self.lock())
    }

    fn write<T>(&self, f: impl FnOnce(&mut LibraryFile) -> Result<T>) -> Result<T> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        let value = f(&mut next)?;
        if let Some(path) = &self.path {
            save_library(&mut next, path)?;
        }
        *guard = next;
        Ok(value)
    }
}

impl ResourceStore for LibraryStore {
    fn list_resources(&self) -> Result<Vec<Resource>> {
        self.read(|library| restore_all(&library.resources))
    }

    fn add_resource(&self, resource: &Resource) -> Result<()> {
        self.write(|library| {
            if library.resource_index(resource.id.as_str()).is_some() {
                return Err(PersistenceError::AlreadyExists {
                    kind: "resource",
                    id: resource.id.to_string(),
                });
            }
            library.resources.push(resource.to_snapshot());
            debug!(id = %resource.id, "resource added");
            Ok(())
        })
    }

    fn delete_resource(&self, id: &ResourceId) -> Result<()> {
        self.write(|library| {
            let index = library
                .resource_index(id.as_str())
                .ok_or_else(|| PersistenceError::not_found("resource", id))?;
            library.resources.remove(index);
            for user in &mut library.users {
                user.saved_resources.retain(|saved| saved != id.as_str());
            }
            debug!(%id, "resource deleted");
            Ok(())
        })
    }

    fn record_download(&self, id: &ResourceId) -> Result<u64> {
        self.write(|library| {
            let index = library
                .resource_index(id.as_str())
                .ok_or_else(|| PersistenceError::not_found("resource", id))?;
            let resource = &mut library.resources[index];
            resource.download_count = resource.download_count.saturating_add(1);
            Ok(resource.download_count)
        })
    }

    fn set_download_url(&self, id: &ResourceId, url: &str) -> Result<()> {
        self.write(|library| {
            let index = library
                .resource_index(id.as_str())
                .ok_or_else(|| PersistenceError::not_found("resource", id))?;
            library.resources[index].download_url = url.to_string();
            Ok(())
        })
    }

    fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.read(|library| restore_all(&library.subjects))
    }

    fn list_colleges(&self) -> Result<Vec<College>> {
        self.read(|library| restore_all(&library.colleges))
    }

    fn add_subject(&self, subject: &Subject) -> Result<()> {
        self.write(|library| {
            let snapshot = subject.to_snapshot();
            match library.subjects.iter_mut().find(|s| s.id == snapshot.id) {
                Some(existing) => *existing = snapshot,
                None => library.subjects.push(snapshot),
            }
            Ok(())
        })
    }

    fn add_college(&self, college: &College) -> Result<()> {
        self.write(|library| {
            let snapshot = college.to_snapshot();
            match library.colleges.iter_mut().find(|c| c.id == snapshot.id) {
                Some(existing) => *existing = snapshot,
                None => library.colleges.push(snapshot),
            }
            Ok(())
        })
    }
}

impl UserStore for LibraryStore {
    fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        self.read(|library| {
            library
                .user_index(id.as_str())
                .map(|index| User::from_snapshot(&library.users[index]))
                .transpose()
        })
    }

    fn save_user(&self, user: &User) -> Result<()> {
        self.write(|library| {
            let snapshot = user.to_snapshot();
            match library.user_index(user.id.as_str()) {
                Some(index) => library.users[index] = snapshot,
                None => library.users.push(snapshot),
            }
            Ok(())
        })
    }

    fn toggle_favorite(&self, user: &UserId, resource: &ResourceId) -> Result<bool> {
        self.write(|library| {
            let index = library
                .user_index(user.as_str())
                .ok_or_else(|| PersistenceError::not_found("user", user))?;
            let mut restored = User::from_snapshot(&library.users[index])?;
            let saved = restored.toggle_saved(resource);
            library.users[index] = restored.to_snapshot();
            Ok(saved)
        })
    }
}

impl SubmissionStore for LibraryStore {
    fn add_submission(&self, submission: &Submission) -> Result<()> {
        self.write(|library| {
            if library.submission_index(submission.id.as_str()).is_some() {
                return Err(PersistenceError::AlreadyExists {
                    kind: "submission",
                    id: submission.id.to_string(),
                });
            }
            if let Some(hash) = &submission.content_hash
                && let Some(existing) = library
                    .submissions
                    .iter()
                    .find(|s| s.content_hash.as_ref() == Some(hash))
            {
                return Err(PersistenceError::DuplicateSubmission {
                    content_hash: hash.clone(),
                    existing: existing.id.clone(),
                });
            }
            library.submissions.push(submission.to_snapshot());
            Ok(())
        })
    }

    fn update_submission(&self, submission: &Submission) -> Result<()> {
        self.write(|library| {
            let index = library
                .submission_index(submission.id.as_str())
                .ok_or_else(|| PersistenceError::not_found("submission", &submission.id))?;
            library.submissions[index] = submission.to_snapshot();
            Ok(())
        })
    }

    fn delete_submission(&self, id: &SubmissionId) -> Result<()> {
        self.write(|library| {
            let index = library
                .submission_index(id.as_str())
                .ok_or_else(|| PersistenceError::not_found("submission", id))?;
            library.submissions.remove(index);
            Ok(())
        })
    }

    fn publish_submission(
        &self,
        submission: &Submission,
        resource: &Resource,
        credits: u32,
    ) -> Result<()> {
        self.write(|library| {
            let index = library
                .submission_index(submission.id.as_str())
                .ok_or_else(|| PersistenceError::not_found("submission", &submission.id))?;
            if library.resource_index(resource.id.as_str()).is_some() {
                return Err(PersistenceError::AlreadyExists {
                    kind: "resource",
                    id: resource.id.to_string(),
                });
            }
            let user_index = library
                .user_index(submission.user_id.as_str())
                .ok_or_else(|| PersistenceError::not_found("user", &submission.user_id))?;
            let mut submitter = User::from_snapshot(&library.users[user_index])?;
            submitter.award_credits(credits);

            library.submissions[index] = submission.to_snapshot();
            library.resources.push(resource.to_snapshot());
            library.users[user_index] = submitter.to_snapshot();
            debug!(submission = %submission.id, resource = %resource.id, "submission published");
            Ok(())
        })
    }

    fn list_submissions(&self) -> Result<Vec<Submission>> {
        self.read(|library| restore_all(&library.submissions))
    }
}

impl AssessmentStore for LibraryStore {
    fn record_assessment(&self, record: &AssessmentRecord) -> Result<()> {
        self.write(|library| {
            library.assessments.push(record.to_snapshot());
            Ok(())
        })
    }

    fn list_assessments(&self, user: &UserId) -> Result<Vec<AssessmentRecord>> {
        self.read(|library| {
            library
                .assessments
                .iter()
                .filter(|a| a.user_id == user.as_str())
                .map(AssessmentRecord::from_snapshot)
                .collect()
        })
    }
}
