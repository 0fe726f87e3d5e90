// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::NO_HEADING_TARGET;
use camino::{FromPathBufError, Utf8PathBuf};
use owo_colors::{OwoColorize, Style};
use std::error::Error;
use test_timers::errors::{ConfigParseError, LibtestReadError, WriteReportError};
use thiserror::Error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

/// Documented exit codes for `cargo test-timers` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum TestTimersExitCode {}

impl TestTimersExitCode {
    /// A user issue happened while setting up the invocation, e.g. an invalid config file.
    pub const SETUP_ERROR: i32 = 96;

    /// Reading or parsing the libtest event stream failed.
    pub const INPUT_ERROR: i32 = 97;

    /// Writing the timing report failed.
    pub const REPORT_ERROR: i32 = 98;
}

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that is expected to happen during normal use, as opposed to a bug.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine current directory")]
    CurrentDirFailed {
        #[source]
        err: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 {
        #[source]
        err: FromPathBufError,
    },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("failed to open input file")]
    InputOpenFailed {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to read libtest events")]
    LibtestReadError {
        #[from]
        err: LibtestReadError,
    },
    #[error("failed to create report file")]
    ReportCreateFailed {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to write report")]
    WriteReportError {
        #[from]
        err: WriteReportError,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigParseError { .. } => TestTimersExitCode::SETUP_ERROR,
            Self::InputOpenFailed { .. } | Self::LibtestReadError { .. } => {
                TestTimersExitCode::INPUT_ERROR
            }
            Self::ReportCreateFailed { .. } | Self::WriteReportError { .. } => {
                TestTimersExitCode::REPORT_ERROR
            }
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, bold: Style) {
        let mut next_error = match &self {
            Self::CurrentDirFailed { err } => {
                tracing::error!("could not determine current directory");
                Some(err as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { err } => {
                tracing::error!("current directory is not valid UTF-8");
                Some(err as &dyn Error)
            }
            Self::ConfigParseError { err } => {
                tracing::error!(
                    "failed to parse config at `{}`",
                    err.config_file().style(bold)
                );
                err.source()
            }
            Self::InputOpenFailed { path, err } => {
                tracing::error!("failed to open input file `{}`", path.style(bold));
                Some(err as &dyn Error)
            }
            Self::LibtestReadError { err } => {
                tracing::error!("{err}");
                err.source()
            }
            Self::ReportCreateFailed { path, err } => {
                tracing::error!("failed to create report file `{}`", path.style(bold));
                Some(err as &dyn Error)
            }
            Self::WriteReportError { err } => {
                tracing::error!("failed to write timing report");
                err.source()
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
