//! Session state and the student-facing operations.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use portal_ai::AiService;
use portal_model::{
    AssessmentRecord, CollegeId, DegreeLevel, Pattern, Resource, ResourceId, ResourceType,
    SubjectId, Submission, SubmissionId, SubmissionStatus, User, UserId, semester_options,
};
use portal_nav::{
    Breadcrumb, Catalog, FilterCache, NavEvent, NavState, Outcome, available_years, breadcrumbs,
};
use portal_persistence::{
    AssessmentStore, AutoSaveConfig, DirtyTracker, ResourceStore, SubmissionStore, UserStore,
    compute_file_hash,
};
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{Result, SessionError};
use crate::writes::{WriteFailure, WriteOutcome, WriteReport};

/// Everything a session needs from storage.
pub trait Backend:
    ResourceStore + UserStore + SubmissionStore + AssessmentStore + 'static
{
}

impl<T> Backend for T where
    T: ResourceStore + UserStore + SubmissionStore + AssessmentStore + 'static
{
}

/// What a student fills in when submitting a paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperDraft {
    pub title: String,
    pub subject_id: SubjectId,
    pub college_id: CollegeId,
    pub semester: u8,
    pub year: u16,
    pub resource_type: ResourceType,
    pub pattern: Pattern,
    pub degree_level: DegreeLevel,
}

pub struct Session<B: Backend> {
    pub(crate) store: Arc<B>,
    pub(crate) catalog: Catalog,
    pub(crate) user: Option<User>,
    pub(crate) ai: Option<Arc<dyn AiService>>,
    pub(crate) recorded: Vec<AssessmentRecord>,
    /// Submissions this session created, reviewed or deleted, ahead of the
    /// store. `None` marks a deletion.
    pub(crate) submissions: BTreeMap<SubmissionId, Option<Submission>>,
    nav: NavState,
    filter: FilterCache,
    pending: JoinSet<WriteOutcome>,
    last_write: Option<oneshot::Receiver<()>>,
    tracker: DirtyTracker,
    autosave: AutoSaveConfig,
}

impl<B: Backend> Session<B> {
    /// Load the catalog (and `user`, if given) from `store`.
    pub async fn open(store: Arc<B>, user: Option<UserId>) -> Result<Self> {
        let loader = Arc::clone(&store);
        let (resources, subjects, colleges, loaded_user) =
            tokio::task::spawn_blocking(move || -> Result<_> {
                let user = match user {
                    Some(id) => Some(
                        loader
                            .get_user(&id)?
                            .ok_or(SessionError::UnknownUser(id))?,
                    ),
                    None => None,
                };
                Ok((
                    loader.list_resources()?,
                    loader.list_subjects()?,
                    loader.list_colleges()?,
                    user,
                ))
            })
            .await
            .map_err(|e| SessionError::Task(e.to_string()))??;

        info!(
            resources = resources.len(),
            subjects = subjects.len(),
            colleges = colleges.len(),
            user = loaded_user.as_ref().map(|u| u.id.as_str()),
            "session opened"
        );

        Ok(Self {
            store,
            catalog: Catalog::new(resources, subjects, colleges),
            user: loaded_user,
            ai: None,
            recorded: Vec::new(),
            submissions: BTreeMap::new(),
            nav: NavState::new(),
            filter: FilterCache::new(),
            pending: JoinSet::new(),
            last_write: None,
            tracker: DirtyTracker::new(),
            autosave: AutoSaveConfig::default(),
        })
    }

    pub fn with_ai(mut self, ai: Arc<dyn AiService>) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_autosave(mut self, config: AutoSaveConfig) -> Self {
        self.autosave = config;
        self
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Resources for the current screen.
    pub fn visible(&mut self) -> Vec<&Resource> {
        let saved = self
            .user
            .as_ref()
            .map(|user| user.saved_resources.clone())
            .unwrap_or_default();
        self.filter
            .visible(&self.catalog, self.nav.view, &self.nav.selection, &saved)
    }

    /// Times the filter actually rescanned the catalog.
    pub fn filter_recomputations(&self) -> u64 {
        self.filter.recomputations()
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(&self.nav, self.catalog.subjects())
    }

    /// Years on offer for the current list, newest first.
    pub fn available_years(&self) -> Vec<u16> {
        available_years(self.catalog.resources(), &self.nav.selection)
    }

    pub fn saved_ids(&self) -> BTreeSet<ResourceId> {
        self.user
            .as_ref()
            .map(|user| user.saved_resources.clone())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Feed one navigation event through the state machine.
    pub fn dispatch(&mut self, event: &NavEvent) -> Result<Outcome> {
        let outcome = self.nav.apply(event, self.is_logged_in())?;
        if outcome == Outcome::LoginRequired {
            info!(event = %event, "login required");
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Student operations
    // ------------------------------------------------------------------

    /// Count a download and return the URL to fetch.
    pub fn record_download(&mut self, id: &ResourceId) -> Result<String> {
        let url = self
            .catalog
            .update_resource(id, |resource| {
                resource.record_download();
                resource.download_url.clone()
            })
            .ok_or_else(|| SessionError::not_found("resource", id))?;

        let id = id.clone();
        self.dispatch_write("record_download", move |store| {
            store.record_download(&id).map(|_| ())
        });
        Ok(url)
    }

    /// Save or unsave a resource. Returns `true` if it is now saved.
    pub fn toggle_favorite(&mut self, id: &ResourceId) -> Result<bool> {
        if self.catalog.resource(id).is_none() {
            return Err(SessionError::not_found("resource", id));
        }
        let user = self.user.as_mut().ok_or(SessionError::LoginRequired {
            operation: "save resources",
        })?;
        let saved = user.toggle_saved(id);

        let (user_id, id) = (user.id.clone(), id.clone());
        self.dispatch_write("toggle_favorite", move |store| {
            store.toggle_favorite(&user_id, &id).map(|_| ())
        });
        Ok(saved)
    }

    /// Submit a paper for moderation.
    ///
    /// The file is fingerprinted so the store can refuse a second upload
    /// of the same content.
    pub async fn submit_paper(&mut self, draft: PaperDraft, file: &Path) -> Result<Submission> {
        let user_id = self
            .user
            .as_ref()
            .map(|user| user.id.clone())
            .ok_or(SessionError::LoginRequired {
                operation: "submit papers",
            })?;
        validate_draft(&draft)?;

        let path = file.to_path_buf();
        let (content_hash, bytes) = tokio::task::spawn_blocking(move || {
            let hash = compute_file_hash(&path)?;
            let bytes = std::fs::metadata(&path)
                .map(|meta| meta.len())
                .map_err(|source| portal_persistence::PersistenceError::Io {
                    operation: "read",
                    path: path.clone(),
                    source,
                })?;
            Ok::<_, portal_persistence::PersistenceError>((hash, bytes))
        })
        .await
        .map_err(|e| SessionError::Task(e.to_string()))??;

        let submission = Submission {
            id: SubmissionId::generate(),
            user_id,
            title: draft.title.trim().to_string(),
            subject_id: draft.subject_id,
            college_id: draft.college_id,
            semester: draft.semester,
            year: draft.year,
            resource_type: draft.resource_type,
            pattern: draft.pattern,
            degree_level: draft.degree_level,
            file_url: file.display().to_string(),
            size: display_size(bytes),
            content_hash: Some(content_hash),
            status: SubmissionStatus::Pending,
            submitted_at: Utc::now(),
            review_note: None,
        };

        self.submissions
            .insert(submission.id.clone(), Some(submission.clone()));
        let stored = submission.clone();
        self.dispatch_write("submit_paper", move |store| store.add_submission(&stored));
        debug!(id = %submission.id, "submission dispatched");
        Ok(submission)
    }

    // ------------------------------------------------------------------
    // Pending writes
    // ------------------------------------------------------------------

    /// Run `write` against the store on the blocking pool.
    ///
    /// Writes reach the store one at a time, in the order they were
    /// dispatched: each waits for its predecessor to finish first.
    pub(crate) fn dispatch_write<F>(&mut self, operation: &'static str, write: F)
    where
        F: FnOnce(&B) -> portal_persistence::Result<()> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let (done, finished) = oneshot::channel();
        let previous = self.last_write.replace(finished);
        self.tracker.mark_dirty();
        self.pending.spawn(async move {
            if let Some(previous) = previous {
                // A dropped sender just means the predecessor is gone.
                let _ = previous.await;
            }
            let result = match tokio::task::spawn_blocking(move || write(&store)).await {
                Ok(written) => written.map_err(SessionError::from),
                Err(e) => Err(SessionError::Task(e.to_string())),
            };
            let _ = done.send(());
            WriteOutcome { operation, result }
        });
    }

    pub fn pending_writes(&self) -> usize {
        self.tracker.pending()
    }

    /// Writes that have failed over the life of the session.
    pub fn failed_writes(&self) -> usize {
        self.tracker.failed()
    }

    /// Await every dispatched write.
    pub async fn settle(&mut self) -> WriteReport {
        let mut report = WriteReport::default();
        while let Some(joined) = self.pending.join_next().await {
            let ok = match joined {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    report.failures.push(WriteFailure {
                        operation: "background write",
                        message: e.to_string(),
                    });
                    false
                }
            };
            if !ok && let Some(failure) = report.failures.last() {
                warn!(
                    operation = failure.operation,
                    error = %failure.message,
                    "store write failed; keeping local change"
                );
            }
            self.tracker.write_finished(ok);
        }
        if report.total() > 0 {
            debug!(
                succeeded = report.succeeded,
                failed = report.failures.len(),
                "pending writes settled"
            );
        }
        report
    }

    /// Settle if the auto-save policy says it is time.
    pub async fn maybe_settle(&mut self) -> Option<WriteReport> {
        if self.tracker.should_auto_save(&self.autosave) {
            Some(self.settle().await)
        } else {
            None
        }
    }

    /// Run a read against the store on the blocking pool.
    pub(crate) async fn read<T, F>(&self, read: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&B) -> portal_persistence::Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        Ok(tokio::task::spawn_blocking(move || read(&store))
            .await
            .map_err(|e| SessionError::Task(e.to_string()))??)
    }

    pub(crate) fn require_user(&self, operation: &'static str) -> Result<&User> {
        self.user
            .as_ref()
            .ok_or(SessionError::LoginRequired { operation })
    }

    pub(crate) fn require_admin(&self, operation: &'static str) -> Result<()> {
        match &self.user {
            Some(user) if user.is_admin => Ok(()),
            _ => Err(SessionError::NotAuthorized { operation }),
        }
    }
}

fn validate_draft(draft: &PaperDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(SessionError::InvalidSubmission("title is empty".to_string()));
    }
    let options = semester_options(draft.pattern, draft.degree_level);
    if !options.contains(&draft.semester) {
        return Err(SessionError::InvalidSubmission(format!(
            "semester {} is outside {}..={}",
            draft.semester,
            options.start(),
            options.end()
        )));
    }
    Ok(())
}

/// Human-readable file size, e.g. `1.4 MB`.
pub fn display_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
