//! Argus: retrying assertions and golden-snapshot comparison for automated
//! UI test suites.
//!
//! Two capabilities, one harness: a flaky or time-dependent assertion is
//! re-evaluated until it holds or a timeout elapses, and values can be
//! checked against golden snapshots, exactly for structured data and by
//! perceptual similarity for screenshots.
//!
//! ```rust,no_run
//! use argus::{AssertionDesc, Config, Harness, SnapshotId};
//!
//! let mut harness = Harness::new(Config::default());
//! let id = SnapshotId::new("checkout", "cart-total")?;
//! let visible = harness.check_bool(
//!     AssertionDesc::new("cart total appears").expecting("(visible? cart-total)"),
//!     || true, // poll the UI driver here
//! )?;
//! assert!(visible);
//! let matched = harness.matches_snapshot(&id, &serde_json::json!({"total": 42}))?;
//! assert!(matched);
//! # Ok::<(), argus::ArgusError>(())
//! ```

pub mod assertion;
pub mod config;
pub mod errors;
pub mod id;
pub mod report;
pub mod retry;
pub mod snapshot;

pub use crate::assertion::{Assertion, Harness};
pub use crate::config::{Config, ImageMatch};
pub use crate::errors::ArgusError;
pub use crate::id::SnapshotId;
pub use crate::report::{
    AssertionDesc, ConsoleSink, Report, ReportBuffer, ReportKind, ReportSink,
};
pub use crate::retry::Attempt;
pub use crate::snapshot::{SnapshotCheck, SnapshotStore};
