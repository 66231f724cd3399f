//! Persistent storage for the study resource portal.
//!
//! This crate owns the data-access seams the rest of the portal talks to
//! (`ResourceStore`, `UserStore`, `SubmissionStore`, `AssessmentStore`) and
//! one implementation of all four, `LibraryStore`, that keeps a whole
//! library in memory and optionally mirrors it to a `.spl` file.
//!
//! # Features
//!
//! - **Zero-copy serialization** with rkyv for fast load times
//! - **Atomic writes** to prevent data corruption
//! - **Duplicate upload detection** via SHA-256 hashing
//! - **Dirty tracking** for optimistic writes that have not landed yet
//!
//! # File Format
//!
//! `.spl` files use a simple binary format:
//!
//! ```text
//! +------------------+
//! | Magic: "SPL\x01" | 4 bytes - file identification
//! +------------------+
//! | Version: 1       | 4 bytes - u32 little-endian schema version
//! +------------------+
//! | rkyv Payload     | Variable - zero-copy deserializable
//! +------------------+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use portal_persistence::{LibraryStore, ResourceStore};
//!
//! let store = LibraryStore::open(Path::new("library.spl"))?;
//! for resource in store.list_resources()? {
//!     println!("{}", resource.title);
//! }
//! ```
//!
//! # Architecture
//!
//! - `types/` - Persistence types (rkyv-serializable snapshots)
//! - `io/` - File I/O operations (save, load, hash)
//! - `store/` - Store traits and the `LibraryStore` implementation
//! - `autosave/` - Dirty tracking for pending writes
//! - `convert.rs` - Model <-> snapshot conversions
//! - `error.rs` - Error types with user-friendly messages

mod autosave;
mod convert;
mod error;
mod io;
mod store;
mod types;

pub use autosave::{AutoSaveConfig, DirtyTracker};
pub use convert::{FromSnapshot, ToSnapshot};
pub use error::{PersistenceError, Result};
pub use io::{
    compute_file_hash, load_library, load_library_async, save_library, save_library_async,
};
pub use store::{AssessmentStore, LibraryStore, ResourceStore, SubmissionStore, UserStore};
pub use types::{
    AssessmentSnapshot, CURRENT_SCHEMA_VERSION, CollegeSnapshot, DegreeSnapshot, LibraryFile,
    MAGIC_BYTES, PatternSnapshot, ResourceSnapshot, ResourceTypeSnapshot, StatusSnapshot,
    SubjectSnapshot, SubmissionSnapshot, UserSnapshot,
};
