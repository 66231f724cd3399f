//! Persistence types for library serialization.
//!
//! These types are designed for zero-copy deserialization with rkyv.
//! They mirror the model types but keep ids, timestamps and enum tokens in
//! storage-friendly form; `convert` re-validates them on the way out.

mod enums;
mod library;
mod records;

pub use enums::{DegreeSnapshot, PatternSnapshot, ResourceTypeSnapshot, StatusSnapshot};
pub use library::LibraryFile;
pub use records::{
    AssessmentSnapshot, CollegeSnapshot, ResourceSnapshot, SubjectSnapshot, SubmissionSnapshot,
    UserSnapshot,
};

/// Current schema version.
///
/// Increment this when making breaking changes to the persistence format.
/// The loader will reject files with version > CURRENT_SCHEMA_VERSION.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Magic bytes at the start of .spl files.
///
/// Format: "SPL" + version byte (0x01 for v1)
pub const MAGIC_BYTES: [u8; 4] = [b'S', b'P', b'L', 0x01];
