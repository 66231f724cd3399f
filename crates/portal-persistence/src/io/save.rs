//! Library saving operations.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, LibraryFile, MAGIC_BYTES};

/// Save a library to a .spl file.
///
/// Uses atomic write (temp file + rename) so a crash mid-save leaves the
/// previous file intact.
pub fn save_library(library: &mut LibraryFile, path: &Path) -> Result<()> {
    library.touch();

    let bytes = serialize_library(library)?;
    let temp_path = path.with_extension("spl.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(&bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        path = %path.display(),
        resources = library.resources.len(),
        bytes = bytes.len(),
        "saved library"
    );
    Ok(())
}

/// Save a library on the blocking thread pool.
pub async fn save_library_async(library: LibraryFile, path: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut library = library;
        save_library(&mut library, &path)
    })
    .await
    .map_err(|e| PersistenceError::Serialization {
        source: Box::new(e),
    })?
}

/// Serialize a library to bytes.
///
/// Format:
/// - 4 bytes: Magic ("SPL\x01")
/// - 4 bytes: Schema version (u32 little-endian)
/// - N bytes: rkyv payload
fn serialize_library(library: &LibraryFile) -> Result<Vec<u8>> {
    let rkyv_bytes = rkyv::to_bytes::<rkyv::rancor::Error>(library).map_err(|e| {
        PersistenceError::Serialization {
            source: Box::new(std::io::Error::other(format!(
                "rkyv serialization failed: {e}"
            ))),
        }
    })?;

    let mut output = Vec::with_capacity(8 + rkyv_bytes.len());
    output.extend_from_slice(&MAGIC_BYTES);
    output.extend_from_slice(&CURRENT_SCHEMA_VERSION.to_le_bytes());
    output.extend_from_slice(&rkyv_bytes);

    Ok(output)
}
