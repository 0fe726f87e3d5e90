// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test identities and terminal outcomes.

use crate::errors::TestOutcomeParseError;
use smol_str::SmolStr;
use std::{borrow::Borrow, fmt, str::FromStr};

/// A stable string key that identifies a single test case within a run.
///
/// This is typically the fully qualified test name, e.g. `tests::parse::empty_input`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestId(SmolStr);

impl TestId {
    /// Creates a new test identity.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TestId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TestId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TestId {
    fn from(id: String) -> Self {
        Self(SmolStr::from(id))
    }
}

/// The terminal outcome of a test, as reported by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum TestOutcome {
    /// The test raised an unexpected fault.
    Error,

    /// The test's own assertions failed.
    Failed,

    /// The test completed successfully.
    Passed,
}

impl TestOutcome {
    /// All outcomes, in the order grouped reports list them.
    pub const ALL: [Self; 3] = [Self::Passed, Self::Failed, Self::Error];

    /// Returns the fixed display label for this outcome.
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Failed => "FAILED",
            Self::Passed => "PASSED",
        }
    }

    /// Returns the string labels accepted by [`FromStr`].
    pub fn variants() -> &'static [&'static str] {
        &["ERROR", "FAILED", "PASSED"]
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TestOutcome {
    type Err = TestOutcomeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|outcome| outcome.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| TestOutcomeParseError::new(s))
    }
}
