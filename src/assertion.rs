//! The assertion surface.
//!
//! An assertion is one of a small closed set of forms, selected by static
//! type rather than runtime inspection: a data-snapshot check, an
//! image-snapshot check, or a generic retryable predicate. The [`Harness`]
//! wires a form through the retry evaluator and emits exactly one report
//! per invocation.

use image::RgbaImage;
use serde_json::Value;

use crate::config::Config;
use crate::errors::ArgusError;
use crate::id::SnapshotId;
use crate::report::{AssertionDesc, ConsoleSink, Report, ReportBuffer, ReportSink};
use crate::retry::{self, Attempt};
use crate::snapshot::check::{CheckOutcome, SnapshotCheck};

/// The closed set of assertion forms.
pub enum Assertion<'a> {
    /// `matches-snapshot?`-style check of a structured value.
    SnapshotData {
        id: &'a SnapshotId,
        actual: &'a Value,
    },
    /// Perceptual check of a decoded raster image.
    SnapshotImage {
        id: &'a SnapshotId,
        actual: &'a RgbaImage,
    },
    /// Arbitrary retryable evaluation with a caller-built description.
    Generic {
        desc: AssertionDesc,
        eval: Box<dyn FnMut(&mut ReportBuffer) -> Attempt + 'a>,
    },
}

impl<'a> Assertion<'a> {
    fn desc(&self) -> AssertionDesc {
        match self {
            Assertion::SnapshotData { id, .. } => {
                AssertionDesc::new(format!("matches-snapshot {id}"))
                    .expecting(format!("data snapshot {id}"))
            }
            Assertion::SnapshotImage { id, .. } => {
                AssertionDesc::new(format!("matches-screenshot {id}"))
                    .expecting(format!("image snapshot {id}"))
            }
            Assertion::Generic { desc, .. } => desc.clone(),
        }
    }

    fn evaluate(&mut self, config: &Config, buffer: &mut ReportBuffer) -> Attempt {
        match self {
            Assertion::SnapshotData { id, actual } => data_attempt(config, id, actual, buffer),
            Assertion::SnapshotImage { id, actual } => image_attempt(config, id, actual, buffer),
            Assertion::Generic { eval, .. } => eval(buffer),
        }
    }
}

// ============================================================================
// PER-VARIANT EVALUATION
// ============================================================================

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn describe_image(image: &RgbaImage) -> String {
    format!("{}x{} image", image.width(), image.height())
}

fn data_attempt(
    config: &Config,
    id: &SnapshotId,
    actual: &Value,
    buffer: &mut ReportBuffer,
) -> Attempt {
    let check = SnapshotCheck::new(config);
    match check.check_data(id, actual) {
        Ok(CheckOutcome::Baselined { path }) => {
            buffer.emit(Report::pass(
                format!("snapshot {id}: new baseline written to {}", path.display()),
                format!("data snapshot {id}"),
                pretty(actual),
            ));
            Attempt::Pass(Value::Bool(true))
        }
        Ok(CheckOutcome::Matched) => {
            buffer.emit(Report::pass(
                format!("snapshot {id} matched"),
                pretty(actual),
                pretty(actual),
            ));
            Attempt::Pass(Value::Bool(true))
        }
        Ok(CheckOutcome::Mismatched(expected)) => {
            buffer.emit(Report::fail(
                format!("snapshot {id} did not match"),
                pretty(&expected),
                pretty(actual),
            ));
            Attempt::Retry {
                last: Value::Bool(false),
                cause: None,
            }
        }
        Err(err) => Attempt::Abort(err),
    }
}

fn image_attempt(
    config: &Config,
    id: &SnapshotId,
    actual: &RgbaImage,
    buffer: &mut ReportBuffer,
) -> Attempt {
    let check = SnapshotCheck::new(config);
    match check.check_image(id, actual) {
        Ok(CheckOutcome::Baselined { path }) => {
            buffer.emit(Report::pass(
                format!("screenshot {id}: new baseline written to {}", path.display()),
                format!("image snapshot {id}"),
                describe_image(actual),
            ));
            Attempt::Pass(Value::Bool(true))
        }
        Ok(CheckOutcome::Matched) => {
            buffer.emit(Report::pass(
                format!("screenshot {id} matched"),
                describe_image(actual),
                describe_image(actual),
            ));
            Attempt::Pass(Value::Bool(true))
        }
        Ok(CheckOutcome::Mismatched(detail)) => {
            buffer.emit(Report::fail(
                format!("screenshot {id} did not match"),
                describe_image(&detail.expected),
                format!(
                    "{}, hash distance {} (threshold {}), review {}",
                    describe_image(actual),
                    detail.distance,
                    detail.threshold,
                    detail.actual_path.display()
                ),
            ));
            Attempt::Retry {
                last: Value::Bool(false),
                cause: None,
            }
        }
        Err(err) => Attempt::Abort(err),
    }
}

// ============================================================================
// HARNESS
// ============================================================================

/// Owns the run configuration and the report sink, and evaluates
/// assertions through the retry loop.
pub struct Harness<S: ReportSink> {
    config: Config,
    sink: S,
}

impl Harness<ConsoleSink> {
    /// A harness reporting to the terminal.
    pub fn new(config: Config) -> Self {
        Self::with_sink(config, ConsoleSink::auto())
    }
}

impl<S: ReportSink> Harness<S> {
    pub fn with_sink(config: Config, sink: S) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Evaluates one assertion form to its final value, retrying per the
    /// configured timeout.
    pub fn assert(&mut self, mut assertion: Assertion<'_>) -> Result<Value, ArgusError> {
        let desc = assertion.desc();
        retry::run(&self.config, &desc, &mut self.sink, |buffer| {
            assertion.evaluate(&self.config, buffer)
        })
    }

    /// Checks `actual` against the golden data snapshot for `id`.
    ///
    /// Returns `Ok(true)` on match or first-run baseline, `Ok(false)` after
    /// the retry budget elapses on a mismatch, and `Err` on terminal
    /// snapshot I/O or codec failures.
    pub fn matches_snapshot(
        &mut self,
        id: &SnapshotId,
        actual: &Value,
    ) -> Result<bool, ArgusError> {
        let value = self.assert(Assertion::SnapshotData { id, actual })?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Checks a decoded raster image against the golden image snapshot for
    /// `id`, using the perceptual comparator.
    pub fn matches_screenshot(
        &mut self,
        id: &SnapshotId,
        actual: &RgbaImage,
    ) -> Result<bool, ArgusError> {
        let value = self.assert(Assertion::SnapshotImage { id, actual })?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Evaluates a generic retryable assertion. The closure reports into
    /// the attempt-local buffer and returns an [`Attempt`] tag.
    pub fn check(
        &mut self,
        desc: AssertionDesc,
        eval: impl FnMut(&mut ReportBuffer) -> Attempt,
    ) -> Result<Value, ArgusError> {
        self.assert(Assertion::Generic {
            desc,
            eval: Box::new(eval),
        })
    }

    /// Convenience wrapper for boolean predicates: builds the pass/fail
    /// reports from the description and degrades to `Ok(false)` on timeout.
    pub fn check_bool(
        &mut self,
        desc: AssertionDesc,
        mut pred: impl FnMut() -> bool,
    ) -> Result<bool, ArgusError> {
        let rendered = desc.clone();
        let value = self.check(desc, move |buffer| {
            if pred() {
                buffer.emit(Report::pass(
                    rendered.message(),
                    rendered.expected(),
                    "true",
                ));
                Attempt::Pass(Value::Bool(true))
            } else {
                buffer.emit(Report::fail(
                    rendered.message(),
                    rendered.expected(),
                    "false",
                ));
                Attempt::Retry {
                    last: Value::Bool(false),
                    cause: None,
                }
            }
        })?;
        Ok(value.as_bool().unwrap_or(false))
    }
}
