// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use camino_tempfile::tempdir;
use color_eyre::eyre::{Result, ensure};
use indoc::indoc;
use pretty_assertions::assert_eq;

#[test]
fn disabled_by_default() -> Result<()> {
    test_init();
    let dir = tempdir()?;

    let output = run_cli(dir.path(), &[], LIBTEST_TRANSCRIPT)?;
    assert_eq!(success_stdout(&output)?, "");
    Ok(())
}

#[test]
fn sorted_report() -> Result<()> {
    test_init();
    let dir = tempdir()?;

    let output = run_cli(dir.path(), &["--with-test-timers"], LIBTEST_TRANSCRIPT)?;
    let stdout = success_stdout(&output)?;
    let lines: Vec<_> = stdout.lines().collect();

    ensure!(lines.len() == 2, "expected two report lines, got:\n{stdout}");
    for line in &lines {
        let (name, rest) = line.split_once(": ").expect("line has a name");
        let (secs, outcome) = rest.split_once(' ').expect("line has an outcome");
        ensure!(
            secs.len() >= 6 && secs.parse::<f64>().is_ok(),
            "duration `{secs}` has four decimal places"
        );
        match name {
            "parser::tests::empty" => assert_eq!(outcome, "(PASSED)"),
            "parser::tests::nested" => assert_eq!(outcome, "(FAILED)"),
            other => panic!("unexpected test in report: {other}"),
        }
    }
    Ok(())
}

#[test]
fn aborted_test_reported_as_error() -> Result<()> {
    test_init();
    let dir = tempdir()?;

    let output = run_cli(dir.path(), &["--with-test-timers"], ABORTED_TRANSCRIPT)?;
    let stdout = success_stdout(&output)?;
    ensure!(
        stdout.starts_with("ffi::tests::segfault: ") && stdout.ends_with(" (ERROR)\n"),
        "unexpected report:\n{stdout}"
    );

    let stderr = String::from_utf8(output.stderr)?;
    ensure!(
        stderr.contains("test never finished"),
        "expected a warning about the aborted test, got:\n{stderr}"
    );
    Ok(())
}

#[test]
fn config_file_enables_grouped_layout() -> Result<()> {
    test_init();
    let dir = tempdir()?;
    std::fs::create_dir_all(dir.path().join(".config"))?;
    std::fs::write(
        dir.path().join(".config/test-timers.toml"),
        indoc! {r#"
            [timers]
            with-test-timers = true
            layout = "grouped"
        "#},
    )?;

    let transcript = indoc! {r#"
        { "type": "test", "name": "b", "event": "failed" }
        { "type": "test", "name": "a", "event": "ok" }
    "#};
    let output = run_cli(dir.path(), &[], transcript)?;
    assert_eq!(
        success_stdout(&output)?,
        indoc! {"
            ----------------------------------------------
            PASSED
            a: 0.0000
            ----------------------------------------------
            FAILED
            b: 0.0000
        "}
    );
    Ok(())
}

#[test]
fn invalid_config_exits_with_setup_error() -> Result<()> {
    test_init();
    let dir = tempdir()?;
    let config_file = dir.path().join("timers.toml");
    std::fs::write(&config_file, "[timers]\nlayout = \"fastest-first\"\n")?;

    let output = run_cli(
        dir.path(),
        &["--with-test-timers", "--config-file", config_file.as_str()],
        "",
    )?;
    assert_eq!(
        output.status.code(),
        Some(cargo_test_timers::TestTimersExitCode::SETUP_ERROR)
    );
    let stderr = String::from_utf8(output.stderr)?;
    ensure!(
        stderr.contains("failed to parse config"),
        "unexpected stderr:\n{stderr}"
    );
    Ok(())
}

#[test]
fn malformed_event_exits_with_input_error() -> Result<()> {
    test_init();
    let dir = tempdir()?;

    let output = run_cli(
        dir.path(),
        &["--with-test-timers"],
        "{ \"type\": \"test\", \"event\": \"ok\" }\n",
    )?;
    assert_eq!(
        output.status.code(),
        Some(cargo_test_timers::TestTimersExitCode::INPUT_ERROR)
    );
    Ok(())
}

#[test]
fn unwritable_report_exits_with_report_error() -> Result<()> {
    test_init();
    let dir = tempdir()?;
    let report = dir.path().join("missing-dir/report.txt");

    let output = run_cli(
        dir.path(),
        &["--with-test-timers", "--output", report.as_str()],
        LIBTEST_TRANSCRIPT,
    )?;
    assert_eq!(
        output.status.code(),
        Some(cargo_test_timers::TestTimersExitCode::REPORT_ERROR)
    );
    let stderr = String::from_utf8(output.stderr)?;
    ensure!(
        stderr.contains("failed to create report file"),
        "unexpected stderr:\n{stderr}"
    );
    Ok(())
}

#[test]
fn captured_output_does_not_abort_report() -> Result<()> {
    test_init();
    let dir = tempdir()?;
    let transcript = indoc! {r#"
        { "type": "test", "event": "started", "name": "debug_print" }
        {
            "k": 1,
        }
        {"status": "ok"}
        { "type": "test", "name": "debug_print", "event": "ok" }
    "#};

    let output = run_cli(dir.path(), &["--with-test-timers"], transcript)?;
    let stdout = success_stdout(&output)?;
    ensure!(
        stdout.starts_with("debug_print: ") && stdout.ends_with(" (PASSED)\n"),
        "unexpected report:\n{stdout}"
    );
    Ok(())
}
