//! Moderation and library management. Every operation here needs an
//! administrator.

use chrono::Utc;
use portal_model::{Resource, ResourceId, Submission, SubmissionId};
use tracing::{info, warn};

use crate::CREDITS_PER_APPROVAL;
use crate::error::{Result, SessionError};
use crate::session::{Backend, Session};

impl<B: Backend> Session<B> {
    /// Submissions still waiting for a decision, oldest first.
    ///
    /// Includes this session's own submissions and decisions, whether or
    /// not their writes have landed yet.
    pub async fn pending_submissions(&self) -> Result<Vec<Submission>> {
        self.require_admin("review submissions")?;
        let mut all = self.read(|store| store.list_submissions()).await?;
        all.retain(|submission| !self.submissions.contains_key(&submission.id));
        all.extend(self.submissions.values().flatten().cloned());
        all.sort_by_key(|submission| submission.submitted_at);
        Ok(all.into_iter().filter(Submission::is_pending).collect())
    }

    async fn find_submission(&self, id: &SubmissionId) -> Result<Submission> {
        if let Some(local) = self.submissions.get(id) {
            return local
                .clone()
                .ok_or_else(|| SessionError::not_found("submission", id));
        }
        let all = self.read(|store| store.list_submissions()).await?;
        all.into_iter()
            .find(|submission| &submission.id == id)
            .ok_or_else(|| SessionError::not_found("submission", id))
    }

    /// Approve a submission: publish it as a resource and credit the
    /// submitter.
    pub async fn approve_submission(
        &mut self,
        id: &SubmissionId,
        note: Option<String>,
    ) -> Result<Resource> {
        self.require_admin("approve submissions")?;
        let mut submission = self.find_submission(id).await?;
        submission.approve(note)?;
        self.submissions
            .insert(submission.id.clone(), Some(submission.clone()));

        let resource = submission.to_resource(ResourceId::generate(), Utc::now());
        self.catalog.add_resource(resource.clone());
        if let Some(user) = self.user.as_mut().filter(|u| u.id == submission.user_id) {
            user.award_credits(CREDITS_PER_APPROVAL);
        }
        info!(submission = %submission.id, resource = %resource.id, "submission approved");

        let published = resource.clone();
        self.dispatch_write("approve_submission", move |store| {
            store.publish_submission(&submission, &published, CREDITS_PER_APPROVAL)
        });
        Ok(resource)
    }

    pub async fn reject_submission(
        &mut self,
        id: &SubmissionId,
        note: Option<String>,
    ) -> Result<Submission> {
        self.require_admin("reject submissions")?;
        let mut submission = self.find_submission(id).await?;
        submission.reject(note)?;
        self.submissions
            .insert(submission.id.clone(), Some(submission.clone()));
        info!(submission = %submission.id, "submission rejected");

        let stored = submission.clone();
        self.dispatch_write("reject_submission", move |store| {
            store.update_submission(&stored)
        });
        Ok(submission)
    }

    /// Drop a submission record entirely, whatever its status.
    pub async fn delete_submission(&mut self, id: &SubmissionId) -> Result<()> {
        self.require_admin("delete submissions")?;
        let submission = self.find_submission(id).await?;
        self.submissions.insert(submission.id.clone(), None);
        info!(submission = %submission.id, "submission deleted");
        self.dispatch_write("delete_submission", move |store| {
            store.delete_submission(&submission.id)
        });
        Ok(())
    }

    /// Point a resource at a new download location.
    pub fn set_download_url(&mut self, id: &ResourceId, url: &str) -> Result<()> {
        self.require_admin("edit resources")?;
        let url = url.trim().to_string();
        if url.is_empty() {
            return Err(SessionError::InvalidInput("download url is empty".to_string()));
        }
        let stored = url.clone();
        self.catalog
            .update_resource(id, move |resource| resource.download_url = stored)
            .ok_or_else(|| SessionError::not_found("resource", id))?;

        let id = id.clone();
        self.dispatch_write("set_download_url", move |store| {
            store.set_download_url(&id, &url)
        });
        Ok(())
    }

    /// Remove a resource from the library.
    pub fn delete_resource(&mut self, id: &ResourceId) -> Result<Resource> {
        self.require_admin("delete resources")?;
        let removed = self
            .catalog
            .remove_resource(id)
            .ok_or_else(|| SessionError::not_found("resource", id))?;
        if let Some(user) = self.user.as_mut() {
            user.saved_resources.remove(id);
        }

        let id = id.clone();
        self.dispatch_write("delete_resource", move |store| store.delete_resource(&id));
        Ok(removed)
    }

    /// Add a resource uploaded by an administrator.
    pub fn add_resource(&mut self, resource: Resource) -> Result<()> {
        self.require_admin("add resources")?;
        if self.catalog.resource(&resource.id).is_some() {
            return Err(SessionError::DuplicateResource(resource.id.to_string()));
        }
        self.catalog.add_resource(resource.clone());
        self.dispatch_write("add_resource", move |store| store.add_resource(&resource));
        Ok(())
    }

    /// Add many resources, skipping ids already in the catalog.
    ///
    /// Returns how many were added.
    pub fn import_resources(&mut self, resources: Vec<Resource>) -> Result<usize> {
        self.require_admin("import resources")?;
        let mut added = 0;
        for resource in resources {
            match self.add_resource(resource) {
                Ok(()) => added += 1,
                Err(SessionError::DuplicateResource(id)) => {
                    warn!(%id, "skipping resource already in the library");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(added)
    }
}
