//! Auto-settle configuration.

use serde::{Deserialize, Serialize};

/// When pending store writes should be awaited without being asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Whether automatic settling is enabled.
    pub enabled: bool,

    /// Quiet period in milliseconds.
    ///
    /// Once no new write has been dispatched for this long, pending
    /// writes are settled.
    pub debounce_ms: u64,

    /// Maximum delay before forcing a settle.
    ///
    /// If writes keep coming, settle after this many milliseconds since
    /// the first unsettled write.
    pub max_delay_ms: u64,

    /// Settle as soon as this many writes are in flight.
    pub max_pending: usize,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 2000,
            max_delay_ms: 30_000,
            max_pending: 32,
        }
    }
}

impl AutoSaveConfig {
    /// Create a disabled config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Check whether pending writes should be settled.
    pub fn should_save(
        &self,
        pending: usize,
        since_last_change_ms: u64,
        since_first_unsaved_ms: u64,
    ) -> bool {
        if !self.enabled || pending == 0 {
            return false;
        }

        pending >= self.max_pending
            || since_last_change_ms >= self.debounce_ms
            || since_first_unsaved_ms >= self.max_delay_ms
    }
}
