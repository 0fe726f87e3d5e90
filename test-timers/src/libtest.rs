// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Driving [`TestHooks`] from libtest's JSON output.
//!
//! Test binaries built with the standard libtest harness print one JSON object per line when run
//! with `-Z unstable-options --format json`:
//!
//! * `{ "type": "suite", "event": "started", "test_count": <u32> }` - start of a test binary run
//! * `{ "type": "test", "event": "started", "name": "<name>" }` - start of a single test
//! * `{ "type": "test", "event": "ok", "name": "<name>" }` - the test passed
//! * `{ "type": "test", "event": "failed", "name": "<name>", "stdout": "<output>" }` - the test
//!   failed
//! * `{ "type": "test", "event": "ignored", "name": "<name>" }` - the test was skipped
//! * `{ "type": "suite", "event": "ok" | "failed", "passed": <u32>, ... }` - end of the binary run
//!
//! Only JSON objects with a `type` field are treated as events. Anything else, including
//! captured test output that isn't valid UTF-8, is skipped.
//!
//! Events are forwarded to the hooks as they are read, so durations are measured against the
//! time each line arrives. A test that started but never finished by the time its suite ended
//! (or the input ran out) took its test binary down with it, and is recorded as an
//! [`Error`](crate::outcome::TestOutcome::Error).

use crate::{errors::LibtestReadError, hooks::TestHooks, outcome::TestId};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::BufRead;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum LibtestEvent {
    Suite {
        event: SuiteEventKind,
    },
    Test {
        event: TestEventKind,
        name: String,
    },
    // Benchmarks and anything newer libtest versions add.
    #[serde(other)]
    Other,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SuiteEventKind {
    Started,
    Ok,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TestEventKind {
    Started,
    Ok,
    Failed,
    Ignored,
    Timeout,
    #[serde(other)]
    Unknown,
}

/// Counts of the events seen by a [`LibtestEventReader`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LibtestSummary {
    /// The number of lines that parsed as libtest events.
    pub events: usize,

    /// The number of test suites (test binaries) that started.
    pub suites: usize,

    /// The number of tests that started.
    pub started: usize,

    /// The number of tests that passed.
    pub passed: usize,

    /// The number of tests that failed.
    pub failed: usize,

    /// The number of tests that were ignored.
    pub ignored: usize,

    /// The number of tests that started but never finished, and were recorded as errors.
    pub orphaned: usize,
}

/// Reads libtest JSON events and forwards them to a set of [`TestHooks`].
///
/// For the format, see the [module-level documentation](self).
pub struct LibtestEventReader<'h, H: ?Sized> {
    hooks: &'h mut H,
    summary: LibtestSummary,
}

impl<'h, H: TestHooks + ?Sized> LibtestEventReader<'h, H> {
    /// Creates a new reader that forwards events to `hooks`.
    pub fn new(hooks: &'h mut H) -> Self {
        Self {
            hooks,
            summary: LibtestSummary::default(),
        }
    }

    /// Reads events from `reader` until it is exhausted.
    ///
    /// Tests still running at the end of the input are recorded as errors.
    pub fn read_from(
        mut self,
        mut reader: impl BufRead,
    ) -> Result<LibtestSummary, LibtestReadError> {
        let mut buf = Vec::new();
        let mut line_number = 0;
        loop {
            buf.clear();
            let bytes_read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|err| LibtestReadError::Io { line_number, err })?;
            if bytes_read == 0 {
                break;
            }
            line_number += 1;

            match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line_number, line)?,
                Err(error) => {
                    debug!(line_number, %error, "skipping line that isn't valid UTF-8");
                }
            }
        }

        self.finish_running("end of input");
        Ok(self.summary)
    }

    /// Handles a single line of input.
    ///
    /// Lines that aren't JSON objects with a `type` field are skipped: test output can be
    /// interleaved with events.
    pub fn handle_line(&mut self, line_number: usize, line: &str) -> Result<(), LibtestReadError> {
        let line = line.trim();
        let Some(object) = parse_event_object(line) else {
            if !line.is_empty() {
                debug!(line_number, "skipping non-event line");
            }
            return Ok(());
        };

        let event: LibtestEvent = serde_json::from_value(Value::Object(object))
            .map_err(|err| LibtestReadError::Parse { line_number, err })?;
        self.summary.events += 1;
        self.handle_event(event);
        Ok(())
    }

    /// Returns the counts of events seen so far.
    pub fn summary(&self) -> &LibtestSummary {
        &self.summary
    }

    fn handle_event(&mut self, event: LibtestEvent) {
        match event {
            LibtestEvent::Suite { event } => match event {
                SuiteEventKind::Started => {
                    self.finish_running("new suite started");
                    self.summary.suites += 1;
                }
                SuiteEventKind::Ok | SuiteEventKind::Failed => {
                    self.finish_running("suite finished");
                }
                SuiteEventKind::Unknown => {
                    debug!("skipping unknown suite event");
                }
            },
            LibtestEvent::Test { event, name } => {
                let test = TestId::from(name);
                match event {
                    TestEventKind::Started => {
                        self.summary.started += 1;
                        self.hooks.start_test(&test);
                    }
                    TestEventKind::Ok => {
                        self.summary.passed += 1;
                        self.hooks.add_success(&test);
                    }
                    TestEventKind::Failed => {
                        self.summary.failed += 1;
                        self.hooks.add_failure(&test);
                    }
                    TestEventKind::Ignored => {
                        self.summary.ignored += 1;
                        self.hooks.forget_test(&test);
                    }
                    TestEventKind::Timeout => {
                        debug!(%test, "test has been running for a long time");
                    }
                    TestEventKind::Unknown => {
                        debug!(%test, "skipping unknown test event");
                    }
                }
            }
            LibtestEvent::Other => {}
        }
    }

    fn finish_running(&mut self, reason: &str) {
        for test in self.hooks.pending_tests() {
            warn!(%test, reason, "test never finished, recording it as an error");
            self.summary.orphaned += 1;
            self.hooks.add_error(&test);
        }
    }
}

/// Returns the line as a JSON object if it looks like a libtest event.
fn parse_event_object(line: &str) -> Option<Map<String, Value>> {
    if !line.starts_with('{') {
        return None;
    }
    match serde_json::from_str::<Value>(line).ok()? {
        Value::Object(object) if object.contains_key("type") => Some(object),
        _ => None,
    }
}
