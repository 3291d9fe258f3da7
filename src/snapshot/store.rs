//! Snapshot artifact storage.
//!
//! Derives canonical paths for a snapshot identifier, bootstraps the
//! snapshot directory, and reads/writes the persisted artifacts. Policy
//! only; the comparators decide what the bytes mean.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use walkdir::WalkDir;

use crate::errors::ArgusError;
use crate::id::SnapshotId;

/// Extension tag for structured-data snapshots.
pub const DATA_EXT: &str = "json";
/// Extension tag for image snapshots.
pub const IMAGE_EXT: &str = "png";

const IGNORE_FILE: &str = ".gitignore";
const IGNORE_PATTERN: &str = "*.actual*\n";

/// File lifecycle manager for one snapshot directory.
///
/// Assumes single-writer access per test process; concurrent suites sharing
/// a directory are a caller precondition, not an enforced guarantee.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Idempotently creates the snapshot directory. On first creation also
    /// writes an ignore-pattern marker so generated actual artifacts stay
    /// out of version control.
    pub fn ensure_directory(&self) -> Result<(), ArgusError> {
        if self.dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir).map_err(|e| ArgusError::io(&self.dir, e))?;
        let ignore = self.dir.join(IGNORE_FILE);
        fs::write(&ignore, IGNORE_PATTERN).map_err(|e| ArgusError::io(&ignore, e))
    }

    /// Path of the durable expected artifact for `id`.
    pub fn expected_path(&self, id: &SnapshotId, ext: &str) -> PathBuf {
        self.artifact_path(id, "expected", ext)
    }

    /// Path of the ephemeral actual artifact for `id`.
    pub fn actual_path(&self, id: &SnapshotId, ext: &str) -> PathBuf {
        self.artifact_path(id, "actual", ext)
    }

    fn artifact_path(&self, id: &SnapshotId, role: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{role}.{ext}", id.file_key()))
    }

    /// Raw contents of `path`, or `None` if the file does not exist.
    pub fn read_existing(&self, path: &Path) -> Result<Option<Vec<u8>>, ArgusError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ArgusError::io(path, e)),
        }
    }

    /// Persists a structured value as pretty-printed JSON.
    pub fn write_data(&self, path: &Path, value: &serde_json::Value) -> Result<(), ArgusError> {
        let mut text = serde_json::to_string_pretty(value).map_err(|e| ArgusError::DataCodec {
            path: path.to_path_buf(),
            source: e,
        })?;
        text.push('\n');
        fs::write(path, text).map_err(|e| ArgusError::io(path, e))
    }

    /// Persists an image as PNG.
    pub fn write_image(&self, path: &Path, image: &RgbaImage) -> Result<(), ArgusError> {
        image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| ArgusError::ImageCodec {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Removes a stale actual artifact; absence is not an error.
    pub fn delete_if_exists(&self, path: &Path) -> Result<(), ArgusError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ArgusError::io(path, e)),
        }
    }

    /// Lists leftover actual artifacts under the snapshot directory, for
    /// auditing runs that failed and were never re-baselined.
    pub fn stale_actuals(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name().to_string_lossy().contains(".actual."))
            .map(|e| e.path().to_path_buf())
            .collect()
    }
}
