//! Tracking of optimistic writes that have not reached the store yet.
//!
//! Provides:
//! - `DirtyTracker` - Counts pending writes and remembers when they started
//! - `AutoSaveConfig` - When a session should settle its pending writes

mod config;
mod tracker;

pub use config::AutoSaveConfig;
pub use tracker::DirtyTracker;
