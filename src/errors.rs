//! Argus Error Handling
//!
//! One unified, `miette`-based error type for every terminal failure mode.
//! Retryable conditions never appear here: the retry loop models those with
//! an explicit [`crate::retry::Attempt`] tag instead of an error, so anything
//! that reaches `ArgusError` stops the assertion immediately.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Argus failure modes.
///
/// Snapshot I/O and codec failures are always terminal: a corrupt or
/// unreadable expected artifact is a broken baseline, not a condition that
/// might pass on the next poll.
#[derive(Debug, Error, Diagnostic)]
pub enum ArgusError {
    #[error("snapshot I/O failed for {}", path.display())]
    #[diagnostic(code(argus::snapshot::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode or decode data snapshot {}", path.display())]
    #[diagnostic(
        code(argus::snapshot::data_codec),
        help("delete the artifact to re-baseline it on the next run")
    )]
    DataCodec {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode or decode image snapshot {}", path.display())]
    #[diagnostic(
        code(argus::snapshot::image_codec),
        help("delete the artifact to re-baseline it on the next run")
    )]
    ImageCodec {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("snapshot identifier has an empty {part}")]
    #[diagnostic(code(argus::id::empty))]
    EmptyId { part: &'static str },

    /// A caller-supplied cause carried by a retryable failure. Propagated
    /// unchanged when the retry budget runs out.
    #[error("{message}")]
    #[diagnostic(code(argus::assertion::failed))]
    AssertionFailed { message: String },
}

impl ArgusError {
    /// Builds an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArgusError::Io {
            path: path.into(),
            source,
        }
    }

    /// Builds an assertion-failure cause from a message.
    pub fn assertion(message: impl Into<String>) -> Self {
        ArgusError::AssertionFailed {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_the_failing_path() {
        let err = ArgusError::io(
            "snaps/missing.expected.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("missing.expected.json"), "{rendered}");
    }

    #[test]
    fn assertion_cause_renders_its_message() {
        let err = ArgusError::assertion("element #cart never appeared");
        assert_eq!(err.to_string(), "element #cart never appeared");
    }

    #[test]
    fn source_chain_is_preserved() {
        let err = ArgusError::io(
            "x",
            std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
        );
        let source = std::error::Error::source(&err).expect("chained source");
        assert!(source.to_string().contains("disk on fire"));
    }
}
