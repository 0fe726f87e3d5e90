// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by test-timers.

use crate::{outcome::TestOutcome, reporter::ReportLayout};
use camino::Utf8PathBuf;
use config::ConfigError;
use thiserror::Error;

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse test-timers config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    err: ConfigError,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, err: ConfigError) -> Self {
        Self {
            config_file: config_file.into(),
            err,
        }
    }

    /// Returns the config file that failed to parse.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }
}

/// Error returned while parsing a [`TestOutcome`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for test outcome: {input}\n(known values: {})",
    TestOutcome::variants().join(", "),
)]
pub struct TestOutcomeParseError {
    input: String,
}

impl TestOutcomeParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Error returned while parsing a [`ReportLayout`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for report layout: {input}\n(known values: {})",
    ReportLayout::variants().join(", "),
)]
pub struct ReportLayoutParseError {
    input: String,
}

impl ReportLayoutParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// An error that occurred while writing the timing report to its output sink.
#[derive(Debug, Error)]
#[error("error writing timing report")]
#[non_exhaustive]
pub struct WriteReportError {
    #[source]
    err: std::io::Error,
}

impl WriteReportError {
    pub(crate) fn new(err: std::io::Error) -> Self {
        Self { err }
    }

    /// Returns the I/O error returned by the output sink.
    pub fn io_error(&self) -> &std::io::Error {
        &self.err
    }
}

impl From<std::io::Error> for WriteReportError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err)
    }
}

/// An error that occurred while reading libtest JSON events.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibtestReadError {
    /// Reading a line from the input failed.
    #[error("error reading libtest events after line {line_number}")]
    Io {
        /// The last line number that was read successfully.
        line_number: usize,

        /// The underlying error.
        #[source]
        err: std::io::Error,
    },

    /// A line looked like a libtest event but could not be parsed.
    #[error("error parsing libtest event on line {line_number}")]
    Parse {
        /// The 1-based line number of the malformed event.
        line_number: usize,

        /// The underlying error.
        #[source]
        err: serde_json::Error,
    },
}
