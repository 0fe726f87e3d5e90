// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The test timing recorder.
//!
//! A [`TimingRecorder`] is driven entirely by its host: the host configures it once, signals the
//! start and end of each test, and finally asks it to write a report. The recorder itself never
//! calls out except to write that report.
//!
//! The recorder moves through these states:
//!
//! ```text
//! Unconfigured --configure(false)--> Disabled
//! Unconfigured --configure(true)---> Active(RunState)
//! Active --configure(true)---------> Active(empty RunState)
//! ```
//!
//! While disabled or unconfigured, every hook is a no-op.

use crate::{
    config::TimerConfig,
    errors::WriteReportError,
    outcome::{TestId, TestOutcome},
    reporter::{ReportLayout, TimingReport},
    time::{Clock, StopwatchStart, SystemClock, stopwatch},
    write_str::WriteStr,
};
use indexmap::IndexMap;
use std::{collections::HashMap, time::Duration};
use tracing::{debug, trace, warn};

/// The duration and outcome recorded for a single test.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimedTest {
    /// Wall-clock time between the start of the test and its outcome being recorded.
    ///
    /// This is zero if the test's outcome was recorded without a preceding start.
    pub duration: Duration,

    /// The terminal outcome of the test.
    pub outcome: TestOutcome,
}

/// Timing and outcome data for a single test run.
///
/// Durations and outcomes are stored together, so every timed test always has an outcome.
/// Entries are kept in the order tests were first recorded.
#[derive(Clone, Debug, Default)]
pub struct RunState {
    // Start times are keyed by test so that overlapping tests don't clobber each other.
    in_progress: HashMap<TestId, StopwatchStart>,
    tests: IndexMap<TestId, TimedTest>,
}

impl RunState {
    /// Returns the number of tests that have been recorded.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns true if no tests have been recorded.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Returns the data recorded for `test`, if any.
    pub fn get(&self, test: &str) -> Option<&TimedTest> {
        self.tests.get(test)
    }

    /// Returns the duration recorded for `test`, if any.
    pub fn duration(&self, test: &str) -> Option<Duration> {
        self.get(test).map(|timed| timed.duration)
    }

    /// Returns the outcome recorded for `test`, if any.
    pub fn outcome(&self, test: &str) -> Option<TestOutcome> {
        self.get(test).map(|timed| timed.outcome)
    }

    /// Iterates over recorded tests in the order they were first recorded.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&TestId, &TimedTest)> {
        self.tests.iter()
    }

    /// Iterates over tests that have started but whose outcome hasn't been recorded yet.
    ///
    /// The order is unspecified.
    pub fn in_progress(&self) -> impl Iterator<Item = &TestId> {
        self.in_progress.keys()
    }
}

#[derive(Clone, Debug)]
enum RecorderState {
    Unconfigured,
    Disabled,
    Active(RunState),
}

/// Records how long each test took, along with its outcome.
///
/// See the [module-level documentation](self) for the lifecycle.
#[derive(Clone, Debug)]
pub struct TimingRecorder<C = SystemClock> {
    clock: C,
    layout: ReportLayout,
    state: RecorderState,
}

impl TimingRecorder<SystemClock> {
    /// Creates a new, unconfigured recorder that reads the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TimingRecorder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimingRecorder<C> {
    /// Creates a new, unconfigured recorder that reads `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            layout: ReportLayout::default(),
            state: RecorderState::Unconfigured,
        }
    }

    /// Configures the recorder from `config`.
    ///
    /// Every call with timers enabled starts over from an empty run state.
    pub fn configure(&mut self, config: &TimerConfig) {
        self.layout = config.layout;
        self.configure_enabled(config.with_test_timers);
    }

    /// Enables or disables the recorder.
    ///
    /// Enabling always starts over from an empty run state, even if the recorder was already
    /// enabled.
    pub fn configure_enabled(&mut self, enabled: bool) {
        debug!(enabled, "configuring test timers");
        self.state = if enabled {
            RecorderState::Active(RunState::default())
        } else {
            RecorderState::Disabled
        };
    }

    /// Returns true if the recorder has been configured and enabled.
    pub fn is_enabled(&self) -> bool {
        matches!(self.state, RecorderState::Active(_))
    }

    /// Returns the layout used by [`Self::report`].
    pub fn layout(&self) -> ReportLayout {
        self.layout
    }

    /// Returns the current run state, or `None` if the recorder isn't enabled.
    pub fn run_state(&self) -> Option<&RunState> {
        match &self.state {
            RecorderState::Active(run_state) => Some(run_state),
            RecorderState::Unconfigured | RecorderState::Disabled => None,
        }
    }

    /// Returns tests that have started but whose outcome hasn't been recorded yet.
    pub fn pending_tests(&self) -> Vec<TestId> {
        let mut pending: Vec<_> = self
            .run_state()
            .into_iter()
            .flat_map(|run_state| run_state.in_progress().cloned())
            .collect();
        pending.sort_unstable();
        pending
    }

    /// Marks the start of `test`.
    ///
    /// A second start for the same test before its outcome is recorded replaces the first.
    pub fn start_test(&mut self, test: &TestId) {
        let RecorderState::Active(run_state) = &mut self.state else {
            return;
        };
        debug!(%test, "test started");
        run_state
            .in_progress
            .insert(test.clone(), stopwatch(&self.clock));
    }

    /// Records the outcome of `test` along with how long it took.
    ///
    /// If `test` was never started, its duration is recorded as zero. This happens when a test
    /// fails before it gets to run, for example during setup.
    ///
    /// Recording an outcome for a test that already has one replaces the earlier entry, keeping
    /// its original position.
    pub fn record_outcome(&mut self, test: &TestId, outcome: TestOutcome) {
        let RecorderState::Active(run_state) = &mut self.state else {
            return;
        };

        let duration = match run_state.in_progress.remove(test) {
            Some(start) => start.elapsed(&self.clock),
            None => {
                debug!(%test, "outcome recorded for a test that never started");
                Duration::ZERO
            }
        };
        debug!(%test, %outcome, ?duration, "test finished");

        if let Some(previous) = run_state
            .tests
            .insert(test.clone(), TimedTest { duration, outcome })
        {
            warn!(
                %test,
                previous_outcome = %previous.outcome,
                "outcome recorded more than once, keeping the latest"
            );
        }
    }

    /// Discards the start time for `test` without recording an outcome.
    ///
    /// Used for tests that were announced but then skipped.
    pub fn forget_test(&mut self, test: &TestId) {
        if let RecorderState::Active(run_state) = &mut self.state {
            if run_state.in_progress.remove(test).is_some() {
                debug!(%test, "discarded start time");
            }
        }
    }

    /// Writes the timing report to `writer`.
    ///
    /// Does nothing if the recorder isn't enabled. The run state is left untouched, so this may
    /// be called at any point.
    pub fn report(&self, writer: &mut dyn WriteStr) -> Result<(), WriteReportError> {
        let Some(run_state) = self.run_state() else {
            trace!("test timers not enabled, skipping report");
            return Ok(());
        };
        trace!(tests = run_state.len(), layout = %self.layout, "writing timing report");
        TimingReport::new(run_state, self.layout).write(writer)
    }
}
