// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writing timing reports.
//!
//! The default [`ReportLayout::Sorted`] layout writes one line per test, fastest first:
//!
//! ```text
//! tests::quick: 0.0200 (PASSED)
//! tests::slow: 0.0500 (FAILED)
//! ```
//!
//! Downstream scripts parse this format, so it must not change.

use crate::{
    errors::{ReportLayoutParseError, WriteReportError},
    outcome::{TestId, TestOutcome},
    recorder::{RunState, TimedTest},
    write_str::WriteStr,
};
use serde::Deserialize;
use std::{fmt, str::FromStr, time::Duration};

/// How a timing report is laid out.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportLayout {
    /// A single list of all tests sorted by duration, each annotated with its outcome.
    #[default]
    Sorted,

    /// One section per outcome, each sorted by duration.
    Grouped,
}

impl ReportLayout {
    /// Returns the string values accepted by [`FromStr`].
    pub fn variants() -> &'static [&'static str] {
        &["sorted", "grouped"]
    }
}

impl fmt::Display for ReportLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sorted => f.write_str("sorted"),
            Self::Grouped => f.write_str("grouped"),
        }
    }
}

impl FromStr for ReportLayout {
    type Err = ReportLayoutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sorted" => Ok(Self::Sorted),
            "grouped" => Ok(Self::Grouped),
            other => Err(ReportLayoutParseError::new(other)),
        }
    }
}

const SECTION_SEPARATOR: &str = "----------------------------------------------";

/// A timing report over a borrowed [`RunState`].
#[derive(Clone, Debug)]
pub struct TimingReport<'a> {
    run_state: &'a RunState,
    layout: ReportLayout,
}

impl<'a> TimingReport<'a> {
    /// Creates a new report.
    pub fn new(run_state: &'a RunState, layout: ReportLayout) -> Self {
        Self { run_state, layout }
    }

    /// Returns recorded tests sorted by ascending duration.
    ///
    /// The sort is stable: tests with equal durations stay in the order they were recorded.
    pub fn sorted_tests(&self) -> Vec<(&'a TestId, &'a TimedTest)> {
        let mut tests: Vec<_> = self.run_state.iter().collect();
        tests.sort_by_key(|(_, timed)| timed.duration);
        tests
    }

    /// Writes the report to `writer`, then flushes it.
    pub fn write(&self, writer: &mut dyn WriteStr) -> Result<(), WriteReportError> {
        let tests = self.sorted_tests();

        match self.layout {
            ReportLayout::Sorted => {
                for (test, timed) in tests {
                    writeln!(
                        writer,
                        "{test}: {} ({})",
                        DisplaySeconds(timed.duration),
                        timed.outcome,
                    )?;
                }
            }
            ReportLayout::Grouped => {
                for outcome in TestOutcome::ALL {
                    let mut group = tests
                        .iter()
                        .filter(|(_, timed)| timed.outcome == outcome)
                        .peekable();
                    if group.peek().is_none() {
                        continue;
                    }

                    writeln!(writer, "{SECTION_SEPARATOR}")?;
                    writeln!(writer, "{outcome}")?;
                    for (test, timed) in group {
                        writeln!(writer, "{test}: {}", DisplaySeconds(timed.duration))?;
                    }
                }
            }
        }

        writer.write_str_flush()?;
        Ok(())
    }
}

/// Displays a duration as fractional seconds with four digits after the decimal point.
struct DisplaySeconds(Duration);

impl fmt::Display for DisplaySeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{recorder::TimingRecorder, time::TestClock};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn sample_run() -> TimingRecorder<TestClock> {
        let clock = TestClock::new();
        let mut recorder = TimingRecorder::with_clock(clock.clone());
        recorder.configure_enabled(true);

        for (name, millis, outcome) in [
            ("slow_pass", 1250, TestOutcome::Passed),
            ("fail", 50, TestOutcome::Failed),
            ("quick_pass", 3, TestOutcome::Passed),
            ("setup_error", 0, TestOutcome::Error),
        ] {
            let test = TestId::new(name);
            if millis > 0 {
                recorder.start_test(&test);
                clock.advance(Duration::from_millis(millis));
            }
            recorder.record_outcome(&test, outcome);
        }

        recorder
    }

    fn render(layout: ReportLayout) -> String {
        let recorder = sample_run();
        let mut out = String::new();
        TimingReport::new(recorder.run_state().unwrap(), layout)
            .write(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn sorted_layout() {
        assert_eq!(
            render(ReportLayout::Sorted),
            indoc! {"
                setup_error: 0.0000 (ERROR)
                quick_pass: 0.0030 (PASSED)
                fail: 0.0500 (FAILED)
                slow_pass: 1.2500 (PASSED)
            "}
        );
    }

    #[test]
    fn grouped_layout() {
        assert_eq!(
            render(ReportLayout::Grouped),
            indoc! {"
                ----------------------------------------------
                PASSED
                quick_pass: 0.0030
                slow_pass: 1.2500
                ----------------------------------------------
                FAILED
                fail: 0.0500
                ----------------------------------------------
                ERROR
                setup_error: 0.0000
            "}
        );
    }

    #[test]
    fn grouped_layout_skips_empty_sections() {
        let mut recorder = TimingRecorder::with_clock(TestClock::new());
        recorder.configure_enabled(true);
        recorder.record_outcome(&TestId::new("only"), TestOutcome::Failed);

        let mut out = String::new();
        TimingReport::new(recorder.run_state().unwrap(), ReportLayout::Grouped)
            .write(&mut out)
            .unwrap();
        assert_eq!(out, format!("{SECTION_SEPARATOR}\nFAILED\nonly: 0.0000\n"));
    }

    #[test]
    fn empty_run_writes_nothing() {
        let run_state = RunState::default();
        for layout in [ReportLayout::Sorted, ReportLayout::Grouped] {
            let mut out = String::new();
            TimingReport::new(&run_state, layout).write(&mut out).unwrap();
            assert_eq!(out, "", "layout {layout} writes nothing");
        }
    }

    #[test_case(Duration::ZERO, "0.0000" ; "zero")]
    #[test_case(Duration::from_micros(12_345), "0.0123" ; "rounds down")]
    #[test_case(Duration::from_micros(56_789), "0.0568" ; "rounds up")]
    #[test_case(Duration::from_secs(75), "75.0000" ; "over a minute")]
    fn display_seconds(duration: Duration, expected: &str) {
        assert_eq!(DisplaySeconds(duration).to_string(), expected);
    }

    #[test]
    fn layout_from_str() {
        assert_eq!("sorted".parse::<ReportLayout>().unwrap(), ReportLayout::Sorted);
        assert_eq!("grouped".parse::<ReportLayout>().unwrap(), ReportLayout::Grouped);
        let err = "by-outcome".parse::<ReportLayout>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unrecognized value for report layout: by-outcome\n(known values: sorted, grouped)"
        );
    }
}
