//! The retry-driven assertion evaluator.
//!
//! Wraps an arbitrary evaluation in a poll loop bounded by the configured
//! timeout. Failures come back as explicit [`Attempt`] tags rather than
//! caught exceptions: the loop inspects the tag to distinguish "not yet
//! satisfied, try again" from "stop immediately".
//!
//! Attempts are strictly sequential and the reported outcome always
//! reflects the last attempt. Each evaluation writes its reports into an
//! invocation-local [`ReportBuffer`] passed as a parameter; only the final
//! attempt's records reach the real sink, so intermediate retries never
//! produce visible noise.

use std::thread;
use std::time::Instant;

use serde_json::Value;

use crate::config::Config;
use crate::errors::ArgusError;
use crate::report::{AssertionDesc, Report, ReportBuffer, ReportSink};

/// Result of one evaluation of a retrying assertion.
#[derive(Debug)]
pub enum Attempt {
    /// Condition satisfied; carries the observed value.
    Pass(Value),
    /// Condition not yet satisfied. `last` is the observed falsy value;
    /// `cause` is an optional underlying failure distinct from "still
    /// false", rethrown if the budget runs out.
    Retry {
        last: Value,
        cause: Option<ArgusError>,
    },
    /// Terminal failure; propagated immediately, never retried.
    Abort(ArgusError),
}

/// Runs `eval` until it passes, aborts, or the timeout elapses.
///
/// On exhaustion with a cause the cause is propagated unchanged; without
/// one the last observed value is returned as the result, so a
/// boolean-style assertion degrades to `false` instead of raising.
pub fn run<F>(
    config: &Config,
    desc: &AssertionDesc,
    sink: &mut dyn ReportSink,
    mut eval: F,
) -> Result<Value, ArgusError>
where
    F: FnMut(&mut ReportBuffer) -> Attempt,
{
    let deadline = Instant::now() + config.timeout();
    loop {
        let mut buffer = ReportBuffer::new();
        match eval(&mut buffer) {
            Attempt::Pass(value) => {
                buffer.drain_into(sink);
                return Ok(value);
            }
            Attempt::Retry { last, cause } => {
                if Instant::now() >= deadline {
                    return match cause {
                        Some(err) => {
                            sink.emit(Report::error(
                                format!("{} timed out", desc.message()),
                                desc.expected(),
                                err.to_string(),
                            ));
                            Err(err)
                        }
                        None => {
                            // The buffer holds the final attempt's own
                            // failure record.
                            buffer.drain_into(sink);
                            Ok(last)
                        }
                    };
                }
                thread::sleep(config.poll_interval());
            }
            Attempt::Abort(err) => {
                sink.emit(Report::error(
                    desc.message(),
                    desc.expected(),
                    err.to_string(),
                ));
                return Err(err);
            }
        }
    }
}
