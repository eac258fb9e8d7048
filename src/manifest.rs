//! Local JSON manifest of archived photos.
//!
//! The manifest is a JSON array of `{"file_name": ..., "size": ...}` objects,
//! one per photo, in the same order the photos are uploaded. By default it is
//! written straight over the target path; atomic mode writes a sibling
//! temporary file and renames it into place instead.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::photo::PhotoRecord;

/// Default manifest path, relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "photos_info.json";

/// One manifest row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Display name of the photo (remote file name without extension).
    pub file_name: String,
    /// Size type letter of the archived rendition.
    pub size: String,
}

impl From<&PhotoRecord> for ManifestEntry {
    fn from(record: &PhotoRecord) -> Self {
        Self {
            file_name: record.display_name.clone(),
            size: record.rendition_type.clone(),
        }
    }
}

/// Errors that can occur while writing or reading the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// File system error writing, renaming or reading the manifest.
    #[error("IO error on manifest {path}: {source}")]
    Io {
        /// The manifest (or temporary) path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Entries could not be serialized.
    #[error("failed to serialize manifest: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An existing manifest is not a valid entry array.
    #[error("invalid manifest {path}: {source}")]
    Parse {
        /// The manifest path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ManifestError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Writes the manifest for a run.
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    path: PathBuf,
    atomic: bool,
}

impl ManifestWriter {
    /// Creates a writer targeting `path` with direct overwrite.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic: false,
        }
    }

    /// Enables or disables write-then-rename.
    #[must_use]
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Returns the manifest path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether write-then-rename is enabled.
    #[must_use]
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    /// Serializes `records` to the manifest path, replacing prior content.
    ///
    /// Returns the written entries.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] if serialization or any file operation fails.
    #[instrument(skip(self, records), fields(path = %self.path.display(), count = records.len()))]
    pub async fn write(&self, records: &[PhotoRecord]) -> Result<Vec<ManifestEntry>, ManifestError> {
        let entries: Vec<ManifestEntry> = records.iter().map(ManifestEntry::from).collect();
        let bytes =
            serde_json::to_vec(&entries).map_err(|source| ManifestError::Serialize { source })?;

        if self.atomic {
            let temp_path = temp_path_for(&self.path);
            tokio::fs::write(&temp_path, &bytes)
                .await
                .map_err(|e| ManifestError::io(&temp_path, e))?;
            tokio::fs::rename(&temp_path, &self.path)
                .await
                .map_err(|e| ManifestError::io(&self.path, e))?;
            debug!(temp = %temp_path.display(), "manifest renamed into place");
        } else {
            tokio::fs::write(&self.path, &bytes)
                .await
                .map_err(|e| ManifestError::io(&self.path, e))?;
        }

        info!(entries = entries.len(), "manifest written");
        Ok(entries)
    }
}

impl Default for ManifestWriter {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_PATH)
    }
}

/// Reads a manifest back from disk.
///
/// # Errors
///
/// Returns [`ManifestError::Io`] if the file cannot be read and
/// [`ManifestError::Parse`] if it is not a valid entry array.
pub async fn read_manifest(path: impl AsRef<Path>) -> Result<Vec<ManifestEntry>, ManifestError> {
    let path = path.as_ref();
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| ManifestError::io(path, e))?;
    serde_json::from_slice(&raw).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, url: &str, size: &str) -> PhotoRecord {
        PhotoRecord {
            display_name: name.to_string(),
            source_url: url.to_string(),
            rendition_type: size.to_string(),
        }
    }

    fn sample_records() -> Vec<PhotoRecord> {
        vec![
            record("10", "u2", "m"),
            record("20", "u3", "l"),
            record("10(2024-03-09)", "u4", "z"),
        ]
    }

    #[test]
    fn test_manifest_entry_from_record() {
        let entry = ManifestEntry::from(&record("10", "u2", "m"));
        assert_eq!(entry.file_name, "10");
        assert_eq!(entry.size, "m");
    }

    #[test]
    fn test_manifest_entry_serializes_field_names() {
        let json = serde_json::to_string(&ManifestEntry::from(&record("10", "u2", "m"))).unwrap();
        assert_eq!(json, r#"{"file_name":"10","size":"m"}"#);
    }

    #[tokio::test]
    async fn test_write_then_read_preserves_order_and_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("photos_info.json");
        let records = sample_records();

        let written = ManifestWriter::new(&path).write(&records).await.unwrap();
        let read = read_manifest(&path).await.unwrap();

        assert_eq!(read.len(), records.len());
        assert_eq!(read, written);
        for (entry, record) in read.iter().zip(&records) {
            assert_eq!(entry.file_name, record.display_name);
            assert_eq!(entry.size, record.rendition_type);
        }
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("photos_info.json");
        std::fs::write(&path, "previous run content that is much longer than the new one").unwrap();

        ManifestWriter::new(&path)
            .write(&[record("1", "u", "s")])
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"[{"file_name":"1","size":"s"}]"#);
    }

    #[tokio::test]
    async fn test_write_empty_records_writes_empty_array() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("photos_info.json");

        let entries = ManifestWriter::new(&path).write(&[]).await.unwrap();

        assert!(entries.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_atomic_write_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("photos_info.json");

        let writer = ManifestWriter::new(&path).atomic(true);
        assert!(writer.is_atomic());
        writer.write(&sample_records()).await.unwrap();

        assert_eq!(read_manifest(&path).await.unwrap().len(), 3);
        assert!(!temp.path().join("photos_info.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails_with_io() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("photos_info.json");

        let result = ManifestWriter::new(&path).write(&sample_records()).await;

        match result {
            Err(ManifestError::Io { path: err_path, .. }) => assert_eq!(err_path, path),
            other => panic!("Expected ManifestError::Io, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_manifest_rejects_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("photos_info.json");
        std::fs::write(&path, "{\"file_name\": 1").unwrap();

        let result = read_manifest(&path).await;
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_temp_path_for_appends_suffix() {
        assert_eq!(
            temp_path_for(Path::new("/tmp/out/photos_info.json")),
            PathBuf::from("/tmp/out/photos_info.json.tmp")
        );
    }

    #[test]
    fn test_default_writer_uses_default_path() {
        let writer = ManifestWriter::default();
        assert_eq!(writer.path(), Path::new(DEFAULT_MANIFEST_PATH));
        assert!(!writer.is_atomic());
    }
}
