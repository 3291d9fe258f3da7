//! Check-or-record orchestration.
//!
//! Binds the store and a comparator into the single snapshot operation:
//! missing expected artifact means baseline-and-pass; a present one is
//! decoded and compared, with the actual artifact written on mismatch and
//! cleaned up on the next matching run.

use std::path::PathBuf;

use image::RgbaImage;
use serde_json::Value;

use crate::config::Config;
use crate::errors::ArgusError;
use crate::id::SnapshotId;

use super::compare::{data_matches, PerceptualMatch};
use super::store::{SnapshotStore, DATA_EXT, IMAGE_EXT};

/// Outcome of one check-or-record pass. `Baselined` counts as success.
#[derive(Debug)]
pub enum CheckOutcome<M> {
    /// No expected artifact existed; the actual value is now the baseline.
    Baselined { path: PathBuf },
    /// Expected and actual matched; any stale actual artifact was removed.
    Matched,
    /// Mismatch; the actual artifact was written for human review.
    Mismatched(M),
}

/// Mismatch detail for image snapshots.
#[derive(Debug)]
pub struct ImageMismatch {
    pub expected: RgbaImage,
    pub distance: u32,
    pub threshold: u32,
    pub actual_path: PathBuf,
}

/// One snapshot assertion bound to a run's configuration.
pub struct SnapshotCheck<'a> {
    config: &'a Config,
    store: SnapshotStore,
}

impl<'a> SnapshotCheck<'a> {
    pub fn new(config: &'a Config) -> Self {
        let store = SnapshotStore::new(&config.snapshot_dir);
        Self { config, store }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Checks a structured value against its golden snapshot.
    ///
    /// Idempotent once baselined: repeated calls with an unchanged actual
    /// value are pure reads plus a comparison.
    pub fn check_data(
        &self,
        id: &SnapshotId,
        actual: &Value,
    ) -> Result<CheckOutcome<Value>, ArgusError> {
        self.store.ensure_directory()?;
        let expected_path = self.store.expected_path(id, DATA_EXT);
        let actual_path = self.store.actual_path(id, DATA_EXT);

        let Some(bytes) = self.store.read_existing(&expected_path)? else {
            self.store.write_data(&expected_path, actual)?;
            return Ok(CheckOutcome::Baselined {
                path: expected_path,
            });
        };
        let expected: Value =
            serde_json::from_slice(&bytes).map_err(|e| ArgusError::DataCodec {
                path: expected_path,
                source: e,
            })?;

        if data_matches(&expected, actual) {
            self.store.delete_if_exists(&actual_path)?;
            Ok(CheckOutcome::Matched)
        } else {
            self.store.write_data(&actual_path, actual)?;
            Ok(CheckOutcome::Mismatched(expected))
        }
    }

    /// Checks a screenshot against its golden snapshot with the perceptual
    /// comparator.
    pub fn check_image(
        &self,
        id: &SnapshotId,
        actual: &RgbaImage,
    ) -> Result<CheckOutcome<ImageMismatch>, ArgusError> {
        self.store.ensure_directory()?;
        let expected_path = self.store.expected_path(id, IMAGE_EXT);
        let actual_path = self.store.actual_path(id, IMAGE_EXT);

        let Some(bytes) = self.store.read_existing(&expected_path)? else {
            self.store.write_image(&expected_path, actual)?;
            return Ok(CheckOutcome::Baselined {
                path: expected_path,
            });
        };
        let expected = image::load_from_memory(&bytes)
            .map_err(|e| ArgusError::ImageCodec {
                path: expected_path,
                source: e,
            })?
            .to_rgba8();

        let comparator = PerceptualMatch::new(self.config.image_match);
        let distance = comparator.distance(&expected, actual);
        if comparator.is_within(distance) {
            self.store.delete_if_exists(&actual_path)?;
            Ok(CheckOutcome::Matched)
        } else {
            self.store.write_image(&actual_path, actual)?;
            Ok(CheckOutcome::Mismatched(ImageMismatch {
                expected,
                distance,
                threshold: comparator.threshold(),
                actual_path,
            }))
        }
    }
}
