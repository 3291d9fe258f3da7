//! Report records and sinks.
//!
//! Every top-level assertion resolves to exactly one [`Report`] of kind
//! pass, fail, or error. Sinks decide where records go: the
//! [`ReportBuffer`] captures them (the retry loop hands each attempt a
//! fresh buffer so intermediate attempts never produce visible noise), and
//! the [`ConsoleSink`] renders them with colored tags and a line diff of
//! expected vs actual on failure.

use difference::Changeset;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

// ============================================================================
// REPORT RECORDS
// ============================================================================

/// The three report kinds of the host framework's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Pass,
    Fail,
    Error,
}

/// One pass/fail/error record: a message plus the rendered expected and
/// actual expressions for human inspection.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl Report {
    pub fn pass(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::record(ReportKind::Pass, message, expected, actual)
    }

    pub fn fail(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::record(ReportKind::Fail, message, expected, actual)
    }

    pub fn error(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::record(ReportKind::Error, message, expected, actual)
    }

    fn record(
        kind: ReportKind,
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Caller-built description of an assertion: the message and the rendered
/// "expected" expression used when the evaluation itself cannot supply them
/// (generic predicates, terminal errors).
#[derive(Debug, Clone)]
pub struct AssertionDesc {
    message: String,
    expected: String,
}

impl AssertionDesc {
    /// Starts a description; the expected expression defaults to the
    /// message until [`expecting`](Self::expecting) overrides it.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let expected = message.clone();
        Self { message, expected }
    }

    pub fn expecting(mut self, expected: impl Into<String>) -> Self {
        self.expected = expected.into();
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }
}

// ============================================================================
// SINKS
// ============================================================================

/// Destination for report records.
pub trait ReportSink {
    fn emit(&mut self, report: Report);
}

/// Capturing sink: collects records for later inspection or replay.
#[derive(Debug, Default)]
pub struct ReportBuffer {
    reports: Vec<Report>,
}

impl ReportBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn last(&self) -> Option<&Report> {
        self.reports.last()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Replays every captured record into `sink`, leaving this buffer empty.
    pub fn drain_into(&mut self, sink: &mut dyn ReportSink) {
        for report in self.reports.drain(..) {
            sink.emit(report);
        }
    }
}

impl ReportSink for ReportBuffer {
    fn emit(&mut self, report: Report) {
        self.reports.push(report);
    }
}

/// Terminal sink: PASS to stdout, FAIL/ERROR to stderr, with a colored
/// line diff of expected vs actual on failure.
pub struct ConsoleSink {
    choice: ColorChoice,
}

impl ConsoleSink {
    /// Colors only when stderr is a tty.
    pub fn auto() -> Self {
        let choice = if atty::is(atty::Stream::Stderr) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self { choice }
    }

    pub fn plain() -> Self {
        Self {
            choice: ColorChoice::Never,
        }
    }

    fn print_tag(&self, stream: &mut StandardStream, tag: &str, color: Color) {
        let _ = stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write_str(stream, tag);
        let _ = stream.reset();
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::auto()
    }
}

impl ReportSink for ConsoleSink {
    fn emit(&mut self, report: Report) {
        match report.kind {
            ReportKind::Pass => {
                let mut stdout = StandardStream::stdout(self.choice);
                self.print_tag(&mut stdout, "PASS", Color::Green);
                println!(": {}", report.message);
            }
            ReportKind::Fail => {
                let mut stderr = StandardStream::stderr(self.choice);
                self.print_tag(&mut stderr, "FAIL", Color::Red);
                eprintln!(": {}", report.message);
                eprintln!("  expected: {}", report.expected);
                eprintln!("  actual:   {}", report.actual);
                let changeset = Changeset::new(&report.expected, &report.actual, "\n");
                print_diff(&mut stderr, &changeset.diffs);
                let _ = stderr.reset();
            }
            ReportKind::Error => {
                let mut stderr = StandardStream::stderr(self.choice);
                self.print_tag(&mut stderr, "ERROR", Color::Red);
                eprintln!(": {}", report.message);
                eprintln!("  expected: {}", report.expected);
                eprintln!("  raised:   {}", report.actual);
            }
        }
    }
}

fn write_str(stream: &mut StandardStream, text: &str) -> std::io::Result<()> {
    use std::io::Write;
    write!(stream, "{}", text)
}

fn print_diff(stream: &mut StandardStream, diffs: &[difference::Difference]) {
    for diff in diffs {
        match diff {
            difference::Difference::Same(ref x) => {
                let _ = stream.reset();
                eprintln!("    {}", x);
            }
            difference::Difference::Add(ref x) => {
                let _ = stream.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                eprintln!("  + {}", x);
            }
            difference::Difference::Rem(ref x) => {
                let _ = stream.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                eprintln!("  - {}", x);
            }
        }
    }
}
