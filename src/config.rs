//! Run-wide configuration.
//!
//! A [`Config`] is constructed once per test process and never mutated.
//! Every field has a default so a host framework can deserialize a partial
//! JSON object; the crate itself never reads configuration files.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Process-wide assertion parameters. Read-only during a test run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Total retry budget for one assertion, in milliseconds.
    pub timeout_ms: u64,
    /// Sleep between retry attempts, in milliseconds.
    pub poll_interval_ms: u64,
    /// Directory holding expected and actual snapshot artifacts.
    pub snapshot_dir: PathBuf,
    /// Perceptual image-match parameters.
    pub image_match: ImageMatch,
}

/// Parameters of the perceptual screenshot comparator.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ImageMatch {
    /// Side length of the downscaled hash grid; the hash carries
    /// `hash_bits * hash_bits` bits.
    pub hash_bits: u32,
    /// Two screenshots match when their hash Hamming distance is strictly
    /// less than this.
    pub threshold: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_ms: 4000,
            poll_interval_ms: 25,
            snapshot_dir: PathBuf::from("test-snapshots"),
            image_match: ImageMatch::default(),
        }
    }
}

impl Default for ImageMatch {
    fn default() -> Self {
        Self {
            hash_bits: 8,
            threshold: 4,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
