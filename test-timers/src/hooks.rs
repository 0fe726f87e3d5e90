// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The callbacks a host test framework invokes while running tests.
//!
//! A host registers an implementation of [`TestHooks`] and calls into it at well-defined points:
//! once at configuration time, around every test, and once at the end of the run. Hosts that
//! run tests from multiple threads can use [`SharedRecorder`] instead of a bare
//! [`TimingRecorder`].

use crate::{
    config::TimerConfig,
    errors::WriteReportError,
    outcome::{TestId, TestOutcome},
    recorder::TimingRecorder,
    time::{Clock, SystemClock},
    write_str::WriteStr,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callbacks invoked by a host test framework over the course of a run.
pub trait TestHooks {
    /// Called once the host has parsed its configuration.
    fn configure(&mut self, config: &TimerConfig);

    /// Called just before a test starts running.
    fn start_test(&mut self, test: &TestId);

    /// Called once a test has a terminal outcome.
    fn record_outcome(&mut self, test: &TestId, outcome: TestOutcome);

    /// Called when a test that was announced as starting is skipped instead.
    fn forget_test(&mut self, _test: &TestId) {}

    /// Called when a test passes.
    fn add_success(&mut self, test: &TestId) {
        self.record_outcome(test, TestOutcome::Passed);
    }

    /// Called when a test's assertions fail.
    fn add_failure(&mut self, test: &TestId) {
        self.record_outcome(test, TestOutcome::Failed);
    }

    /// Called when a test raises an unexpected fault.
    fn add_error(&mut self, test: &TestId) {
        self.record_outcome(test, TestOutcome::Error);
    }

    /// Returns tests that have started but don't have an outcome yet, sorted by identity.
    ///
    /// Hosts use this to close out tests that will never finish, e.g. because the process
    /// running them crashed.
    fn pending_tests(&self) -> Vec<TestId>;

    /// Called once, after all tests have run.
    fn report(&self, writer: &mut dyn WriteStr) -> Result<(), WriteReportError>;
}

impl<C: Clock> TestHooks for TimingRecorder<C> {
    fn configure(&mut self, config: &TimerConfig) {
        TimingRecorder::configure(self, config);
    }

    fn start_test(&mut self, test: &TestId) {
        TimingRecorder::start_test(self, test);
    }

    fn record_outcome(&mut self, test: &TestId, outcome: TestOutcome) {
        TimingRecorder::record_outcome(self, test, outcome);
    }

    fn forget_test(&mut self, test: &TestId) {
        TimingRecorder::forget_test(self, test);
    }

    fn pending_tests(&self) -> Vec<TestId> {
        TimingRecorder::pending_tests(self)
    }

    fn report(&self, writer: &mut dyn WriteStr) -> Result<(), WriteReportError> {
        TimingRecorder::report(self, writer)
    }
}

/// A [`TimingRecorder`] that can be shared across threads.
///
/// Every hook takes the lock for the duration of the call. Clones refer to the same recorder.
#[derive(Debug)]
pub struct SharedRecorder<C = SystemClock> {
    inner: Arc<Mutex<TimingRecorder<C>>>,
}

impl<C> Clone for SharedRecorder<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: Clock> SharedRecorder<C> {
    /// Wraps `recorder` for shared use.
    pub fn new(recorder: TimingRecorder<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(recorder)),
        }
    }

    /// Locks the recorder for direct access.
    pub fn lock(&self) -> MutexGuard<'_, TimingRecorder<C>> {
        // A poisoned lock means a hook panicked partway through; the recorded data is still
        // consistent because every mutation is a single map operation.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the start of `test`.
    pub fn start_test(&self, test: &TestId) {
        self.lock().start_test(test);
    }

    /// Records the outcome of `test`.
    pub fn record_outcome(&self, test: &TestId, outcome: TestOutcome) {
        self.lock().record_outcome(test, outcome);
    }

    /// Writes the timing report to `writer`.
    pub fn report(&self, writer: &mut dyn WriteStr) -> Result<(), WriteReportError> {
        self.lock().report(writer)
    }
}

impl<C: Clock> TestHooks for SharedRecorder<C> {
    fn configure(&mut self, config: &TimerConfig) {
        self.lock().configure(config);
    }

    fn start_test(&mut self, test: &TestId) {
        SharedRecorder::start_test(self, test);
    }

    fn record_outcome(&mut self, test: &TestId, outcome: TestOutcome) {
        SharedRecorder::record_outcome(self, test, outcome);
    }

    fn forget_test(&mut self, test: &TestId) {
        self.lock().forget_test(test);
    }

    fn pending_tests(&self) -> Vec<TestId> {
        self.lock().pending_tests()
    }

    fn report(&self, writer: &mut dyn WriteStr) -> Result<(), WriteReportError> {
        SharedRecorder::report(self, writer)
    }
}
