// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drives the library end to end with a controlled clock, the way a host test framework would.

use crate::fixtures::*;
use color_eyre::eyre::Result;
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::time::Duration;
use test_timers::{
    config::TimerConfig,
    hooks::{SharedRecorder, TestHooks},
    libtest::LibtestEventReader,
    outcome::{TestId, TestOutcome},
    recorder::TimingRecorder,
    reporter::ReportLayout,
    time::TestClock,
};

#[test]
fn libtest_transcript_grouped() -> Result<()> {
    test_init();
    let clock = TestClock::new();
    let mut recorder = TimingRecorder::with_clock(clock.clone());
    recorder.configure(&TimerConfig {
        with_test_timers: true,
        layout: ReportLayout::Grouped,
    });

    let mut reader = LibtestEventReader::new(&mut recorder);
    for (index, line) in LIBTEST_TRANSCRIPT.lines().enumerate() {
        reader.handle_line(index + 1, line)?;
        clock.advance(Duration::from_millis(250));
    }
    assert_eq!(reader.summary().ignored, 1);

    let mut out = String::new();
    recorder.report(&mut out)?;
    // empty started at line 2 and passed at line 6; nested started at line 3 and failed at line 7.
    assert_eq!(
        out,
        indoc! {"
            ----------------------------------------------
            PASSED
            parser::tests::empty: 1.0000
            ----------------------------------------------
            FAILED
            parser::tests::nested: 1.0000
        "}
    );
    Ok(())
}

#[test]
fn host_framework_scenario() -> Result<()> {
    test_init();
    let clock = TestClock::new();
    let mut hooks = SharedRecorder::new(TimingRecorder::with_clock(clock.clone()));
    hooks.configure(&TimerConfig::enabled());

    for (name, millis, outcome) in [
        ("test_login", 2000, TestOutcome::Passed),
        ("test_logout", 500, TestOutcome::Failed),
        ("test_signup", 1200, TestOutcome::Error),
    ] {
        let test = TestId::new(name);
        TestHooks::start_test(&mut hooks, &test);
        clock.advance(Duration::from_millis(millis));
        match outcome {
            TestOutcome::Passed => hooks.add_success(&test),
            TestOutcome::Failed => hooks.add_failure(&test),
            TestOutcome::Error => hooks.add_error(&test),
        }
    }

    let mut out = String::new();
    TestHooks::report(&hooks, &mut out)?;
    assert_eq!(
        out,
        indoc! {"
            test_logout: 0.5000 (FAILED)
            test_signup: 1.2000 (ERROR)
            test_login: 2.0000 (PASSED)
        "}
    );
    Ok(())
}
