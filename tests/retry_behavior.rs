//! Retry-loop behavior through the public harness surface.

use std::time::Instant;

use argus::{
    ArgusError, AssertionDesc, Attempt, Config, Harness, Report, ReportBuffer, ReportKind,
    ReportSink,
};
use serde_json::{json, Value};

fn harness(timeout_ms: u64) -> Harness<ReportBuffer> {
    let config = Config {
        timeout_ms,
        poll_interval_ms: 5,
        ..Config::default()
    };
    Harness::with_sink(config, ReportBuffer::new())
}

#[test]
fn eventually_true_assertion_passes_with_one_report() {
    let mut harness = harness(2000);
    let mut polls = 0u32;
    let started = Instant::now();

    let ok = harness
        .check_bool(AssertionDesc::new("spinner goes away"), || {
            polls += 1;
            polls >= 4
        })
        .unwrap();

    assert!(ok);
    assert_eq!(polls, 4);
    assert!(started.elapsed().as_millis() < 2000, "finished before timeout");
    let reports = harness.sink().reports();
    assert_eq!(reports.len(), 1, "no intermediate noise");
    assert_eq!(reports[0].kind, ReportKind::Pass);
}

#[test]
fn never_true_assertion_degrades_to_false() {
    let mut harness = harness(60);
    let ok = harness
        .check_bool(AssertionDesc::new("ghost element appears"), || false)
        .unwrap();
    assert!(!ok);
    let reports = harness.sink().reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, ReportKind::Fail);
}

#[test]
fn last_observed_value_wins_on_exhaustion() {
    let mut harness = harness(60);
    let mut polls = 0u32;
    let value = harness
        .check(AssertionDesc::new("row count settles"), |buffer| {
            polls += 1;
            buffer.emit(Report::fail(
                "row count settles",
                "20 rows",
                format!("{} rows", polls),
            ));
            Attempt::Retry {
                last: json!(polls),
                cause: None,
            }
        })
        .unwrap();

    // The returned value and the single emitted report are both from the
    // final attempt, not an earlier one.
    assert_eq!(value, json!(polls));
    let reports = harness.sink().reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].actual, format!("{} rows", polls));
}

#[test]
fn carried_cause_is_rethrown_after_timeout() {
    let mut harness = harness(60);
    let err = harness
        .check(AssertionDesc::new("table loads"), |_buffer| Attempt::Retry {
            last: Value::Bool(false),
            cause: Some(ArgusError::assertion("connection reset by driver")),
        })
        .expect_err("cause must be propagated unchanged");
    assert!(matches!(err, ArgusError::AssertionFailed { .. }));
    assert_eq!(err.to_string(), "connection reset by driver");
    assert_eq!(harness.sink().reports()[0].kind, ReportKind::Error);
}

#[test]
fn terminal_failure_short_circuits() {
    let mut harness = harness(10_000);
    let started = Instant::now();
    let mut attempts = 0u32;

    let err = harness
        .check(AssertionDesc::new("panel renders"), |_buffer| {
            attempts += 1;
            Attempt::Abort(ArgusError::assertion("browser process exited"))
        })
        .expect_err("terminal failures are never retried");

    assert_eq!(attempts, 1);
    assert!(started.elapsed().as_millis() < 1000);
    assert_eq!(err.to_string(), "browser process exited");
    assert_eq!(harness.sink().reports().len(), 1);
    assert_eq!(harness.sink().reports()[0].kind, ReportKind::Error);
}
