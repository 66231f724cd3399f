//! Portal users.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::{ResourceId, UserId};

/// A registered student or administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    /// Credits earned through approved submissions.
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub saved_resources: BTreeSet<ResourceId>,
}

impl User {
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: None,
            is_admin: false,
            credits: 0,
            saved_resources: BTreeSet::new(),
        }
    }

    pub fn is_saved(&self, resource: &ResourceId) -> bool {
        self.saved_resources.contains(resource)
    }

    /// Flip the saved flag for a resource. Returns `true` if it is now saved.
    pub fn toggle_saved(&mut self, resource: &ResourceId) -> bool {
        if self.saved_resources.remove(resource) {
            false
        } else {
            self.saved_resources.insert(resource.clone());
            true
        }
    }

    pub fn award_credits(&mut self, amount: u32) {
        self.credits = self.credits.saturating_add(amount);
    }
}
