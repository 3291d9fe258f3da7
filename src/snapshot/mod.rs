//! Golden-snapshot storage and comparison.
//!
//! A snapshot is a persisted reference artifact a later run compares the
//! live result against. Expected artifacts are durable and belong in
//! version control; actual artifacts are ephemeral review aids, written
//! only on mismatch and deleted on the next matching run.

pub mod check;
pub mod compare;
pub mod hash;
pub mod store;

pub use check::{CheckOutcome, ImageMismatch, SnapshotCheck};
pub use compare::{data_matches, PerceptualMatch};
pub use hash::{average_hash, ImageHash};
pub use store::{SnapshotStore, DATA_EXT, IMAGE_EXT};
