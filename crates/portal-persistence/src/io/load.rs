//! Library loading operations.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, LibraryFile, MAGIC_BYTES};

/// Load a library from a .spl file.
pub fn load_library(path: &Path) -> Result<LibraryFile> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_library_bytes(&bytes, path)
}

/// Load a library on the blocking thread pool.
pub async fn load_library_async(path: PathBuf) -> Result<LibraryFile> {
    tokio::task::spawn_blocking(move || load_library(&path))
        .await
        .map_err(|e| PersistenceError::Deserialization {
            source: Box::new(e),
        })?
}

fn parse_library_bytes(bytes: &[u8], path: &Path) -> Result<LibraryFile> {
    // Minimum size: magic (4) + version (4) + some payload
    if bytes.len() < 12 {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "File too small".to_string(),
        });
    }

    if bytes[0..4] != MAGIC_BYTES {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "Not a portal library file (invalid magic bytes)".to_string(),
        });
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    let library = rkyv::from_bytes::<LibraryFile, rkyv::rancor::Error>(&bytes[8..]).map_err(
        |e| PersistenceError::Deserialization {
            source: Box::new(std::io::Error::other(format!(
                "rkyv deserialization failed: {e}"
            ))),
        },
    )?;

    tracing::debug!(
        path = %path.display(),
        version,
        resources = library.resources.len(),
        "loaded library"
    );
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save::save_library;
    use crate::types::SubjectSnapshot;
    use tempfile::tempdir;

    #[test]
    fn test_load_library_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.spl");

        let mut library = LibraryFile::new();
        library.subjects.push(SubjectSnapshot {
            id: "phy".to_string(),
            name: "Physics".to_string(),
            icon: None,
        });
        save_library(&mut library, &path).unwrap();

        let loaded = load_library(&path).unwrap();
        assert_eq!(loaded, library);
    }

    #[test]
    fn test_load_invalid_magic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.spl");
        fs::write(&path, b"NOT_A_LIBRARY_FILE").unwrap();

        assert!(matches!(
            load_library(&path),
            Err(PersistenceError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_load_unsupported_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.spl");

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC_BYTES);
        bytes.extend_from_slice(&999u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 100]);
        fs::write(&path, bytes).unwrap();

        assert!(matches!(
            load_library(&path),
            Err(PersistenceError::UnsupportedVersion { found: 999, .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_library(&dir.path().join("absent.spl")),
            Err(PersistenceError::Io { operation: "read", .. })
        ));
    }
}
