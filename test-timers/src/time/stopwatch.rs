// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stopwatch for tracking how long a single test takes.
//!
//! A stopwatch is started when the host signals that a test is about to run, and consumed when
//! the host reports the test's outcome. Elapsed time is always read off a monotonic [`Clock`].

use super::Clock;
use std::time::{Duration, Instant};

pub(crate) fn stopwatch(clock: &impl Clock) -> StopwatchStart {
    StopwatchStart {
        instant: clock.now(),
    }
}

/// The start state of a stopwatch.
#[derive(Copy, Clone, Debug)]
pub(crate) struct StopwatchStart {
    instant: Instant,
}

impl StopwatchStart {
    /// Returns the time elapsed between the start of the stopwatch and `clock`'s current reading.
    ///
    /// Saturates at zero if the clock reads earlier than the start.
    pub(crate) fn elapsed(&self, clock: &impl Clock) -> Duration {
        clock.now().saturating_duration_since(self.instant)
    }
}
