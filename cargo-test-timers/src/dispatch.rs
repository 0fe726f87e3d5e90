// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level application and command routing.

use crate::{
    ExpectedError, Result,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Subcommand};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter},
};
use test_timers::{
    config::TimerConfig, libtest::LibtestEventReader, recorder::TimingRecorder,
    reporter::ReportLayout,
};
use tracing::{debug, info, warn};

/// Report how long each test took, fastest first.
///
/// This binary should typically be invoked as `cargo test-timers` (in which case
/// this message will not be seen), not `cargo-test-timers`.
#[derive(Debug, clap::Parser)]
#[command(
    version,
    bin_name = "cargo",
    styles = crate::output::clap_styles(),
    max_term_width = 100,
)]
pub struct CargoTestTimersApp {
    #[clap(subcommand)]
    subcommand: TestTimersSubcommand,
}

impl CargoTestTimersApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        match &self.subcommand {
            TestTimersSubcommand::TestTimers(opts) => opts.output.init(),
        }
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.subcommand {
            TestTimersSubcommand::TestTimers(opts) => opts.exec(output, output_writer),
        }
    }
}

#[derive(Debug, Subcommand)]
enum TestTimersSubcommand {
    /// Time tests from a libtest JSON event stream.
    ///
    /// Pipe the output of `cargo test -- -Z unstable-options --format json` into this command.
    /// Once the stream ends, one line per test is printed, fastest first.
    TestTimers(Box<AppOpts>),
}

#[derive(Debug, Args)]
struct AppOpts {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(flatten)]
    timers: TimerOpts,

    /// Read libtest events from this file [default: standard input]
    #[arg(long, value_name = "PATH")]
    input: Option<Utf8PathBuf>,

    /// Write the report to this file [default: standard output]
    #[arg(long = "output", value_name = "PATH")]
    report_file: Option<Utf8PathBuf>,
}

impl AppOpts {
    fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let current_dir = current_dir_utf8()?;
        let config = self.timers.make_config(&current_dir)?;

        let mut recorder = TimingRecorder::new();
        recorder.configure(&config);
        if !recorder.is_enabled() {
            info!("test timers are disabled (pass --with-test-timers to enable them)");
        }

        let reader = LibtestEventReader::new(&mut recorder);
        let read_result = match &self.input {
            Some(path) => {
                let file = File::open(path).map_err(|err| ExpectedError::InputOpenFailed {
                    path: path.clone(),
                    err,
                })?;
                reader.read_from(BufReader::new(file))
            }
            None => reader.read_from(io::stdin().lock()),
        };
        match &read_result {
            Ok(summary) if output.verbose => {
                info!(
                    suites = summary.suites,
                    passed = summary.passed,
                    failed = summary.failed,
                    ignored = summary.ignored,
                    orphaned = summary.orphaned,
                    "finished reading test events"
                );
            }
            Ok(summary) => debug!(?summary, "finished reading test events"),
            Err(_) => warn!("reading test events failed, reporting the tests recorded so far"),
        }

        // Report whatever was recorded, even if reading stopped partway through.
        match &self.report_file {
            Some(path) => {
                let file = File::create(path).map_err(|err| ExpectedError::ReportCreateFailed {
                    path: path.clone(),
                    err,
                })?;
                recorder.report(&mut BufWriter::new(file))?;
            }
            None => recorder.report(output_writer.stdout_writer().as_mut())?,
        }

        read_result?;
        Ok(0)
    }
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Timer options")]
struct TimerOpts {
    /// Record test timings and report them once all tests have run
    #[arg(long, env = "TEST_TIMERS")]
    with_test_timers: bool,

    /// Report layout: sorted, grouped [default: sorted]
    #[arg(long, value_name = "LAYOUT")]
    layout: Option<ReportLayout>,

    /// Config file [default: .config/test-timers.toml in the current directory]
    #[arg(long, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,
}

impl TimerOpts {
    /// Reads the config file, then applies command-line overrides on top.
    fn make_config(&self, current_dir: &Utf8Path) -> Result<TimerConfig> {
        let mut config = TimerConfig::from_sources(current_dir, self.config_file.as_deref())?;
        if self.with_test_timers {
            config.with_test_timers = true;
        }
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        Ok(config)
    }
}

fn current_dir_utf8() -> Result<Utf8PathBuf> {
    let current_dir =
        std::env::current_dir().map_err(|err| ExpectedError::CurrentDirFailed { err })?;
    Utf8PathBuf::try_from(current_dir).map_err(|err| ExpectedError::CurrentDirInvalidUtf8 { err })
}
