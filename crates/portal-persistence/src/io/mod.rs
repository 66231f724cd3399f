//! File I/O operations for library persistence.
//!
//! This module handles:
//! - Saving libraries with atomic writes
//! - Loading libraries with format validation
//! - File hashing for duplicate upload detection

mod hash;
mod load;
mod save;

pub use hash::compute_file_hash;
pub use load::{load_library, load_library_async};
pub use save::{save_library, save_library_async};
