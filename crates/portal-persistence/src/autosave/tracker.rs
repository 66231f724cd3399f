//! Pending write tracking.

use std::time::Instant;

use super::AutoSaveConfig;

/// Tracks optimistic changes whose store writes have not finished.
///
/// A change is dirty from the moment its write is dispatched until every
/// write dispatched so far has completed. Failed writes are counted but do
/// not keep the tracker dirty; the local state stands either way.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    /// Writes dispatched but not yet finished.
    pending: usize,

    /// When the most recent write was dispatched.
    last_change: Option<Instant>,

    /// When the oldest unfinished write was dispatched.
    first_unsaved_change: Option<Instant>,

    /// Writes that finished with an error since the tracker was created.
    failed: usize,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if any write is still in flight.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.pending > 0
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending
    }

    #[inline]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Record that a write was dispatched.
    pub fn mark_dirty(&mut self) {
        let now = Instant::now();
        self.pending += 1;
        self.last_change = Some(now);
        if self.first_unsaved_change.is_none() {
            self.first_unsaved_change = Some(now);
        }
    }

    /// Record that one write finished.
    pub fn write_finished(&mut self, success: bool) {
        self.pending = self.pending.saturating_sub(1);
        if !success {
            self.failed += 1;
        }
        if self.pending == 0 {
            self.first_unsaved_change = None;
        }
    }

    /// Milliseconds since the last write was dispatched.
    pub fn ms_since_last_change(&self) -> Option<u64> {
        self.last_change.map(elapsed_ms)
    }

    /// Milliseconds since the oldest unfinished write was dispatched.
    pub fn ms_since_first_unsaved(&self) -> Option<u64> {
        self.first_unsaved_change.map(elapsed_ms)
    }

    /// Check if pending writes should be settled now.
    pub fn should_auto_save(&self, config: &AutoSaveConfig) -> bool {
        match (self.ms_since_last_change(), self.ms_since_first_unsaved()) {
            (Some(since_last), Some(since_first)) => {
                config.should_save(self.pending, since_last, since_first)
            }
            _ => false,
        }
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_new_tracker_is_clean() {
        let tracker = DirtyTracker::new();
        assert!(!tracker.is_dirty());
        assert_eq!(tracker.pending(), 0);
    }

    #[test]
    fn test_dirty_until_all_writes_finish() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty();
        tracker.mark_dirty();
        assert_eq!(tracker.pending(), 2);

        tracker.write_finished(true);
        assert!(tracker.is_dirty());
        assert!(tracker.ms_since_first_unsaved().is_some());

        tracker.write_finished(false);
        assert!(!tracker.is_dirty());
        assert_eq!(tracker.failed(), 1);
        assert!(tracker.ms_since_first_unsaved().is_none());
    }

    #[test]
    fn test_should_auto_save_timing() {
        let mut tracker = DirtyTracker::new();
        let config = AutoSaveConfig {
            debounce_ms: 50,
            ..AutoSaveConfig::default()
        };

        assert!(!tracker.should_auto_save(&config));

        tracker.mark_dirty();
        assert!(!tracker.should_auto_save(&config));

        thread::sleep(Duration::from_millis(60));
        assert!(tracker.should_auto_save(&config));

        tracker.write_finished(true);
        assert!(!tracker.should_auto_save(&config));
    }
}
