// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use color_eyre::eyre::{Context, Result, ensure};
use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

/// A libtest JSON transcript for a single test binary with one test of each outcome, plus one
/// ignored test.
pub(crate) const LIBTEST_TRANSCRIPT: &str = r#"{ "type": "suite", "event": "started", "test_count": 4 }
{ "type": "test", "event": "started", "name": "parser::tests::empty" }
{ "type": "test", "event": "started", "name": "parser::tests::nested" }
{ "type": "test", "event": "started", "name": "parser::tests::unicode" }
{ "type": "test", "name": "parser::tests::unicode", "event": "ignored", "message": "not yet implemented" }
{ "type": "test", "name": "parser::tests::empty", "event": "ok" }
{ "type": "test", "name": "parser::tests::nested", "event": "failed", "stdout": "thread 'parser::tests::nested' panicked" }
{ "type": "suite", "event": "failed", "passed": 1, "failed": 1, "ignored": 1, "measured": 0, "filtered_out": 0, "exec_time": 0.002 }
"#;

/// A transcript for a test binary that aborted while a test was running.
pub(crate) const ABORTED_TRANSCRIPT: &str = r#"{ "type": "suite", "event": "started", "test_count": 2 }
{ "type": "test", "event": "started", "name": "ffi::tests::segfault" }
"#;

pub(crate) fn test_init() {
    // Only the first call installs the hook.
    let _ = color_eyre::install();
}

/// Runs `cargo-test-timers test-timers` with `args`, feeding `stdin` to it.
pub(crate) fn run_cli(cwd: &Utf8Path, args: &[&str], stdin: &str) -> Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cargo-test-timers"))
        .arg("test-timers")
        .args(args)
        .current_dir(cwd)
        .env_remove("TEST_TIMERS")
        .env_remove("TEST_TIMERS_LOG")
        .env("CARGO_TERM_COLOR", "never")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .wrap_err("failed to spawn cargo-test-timers")?;

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .wrap_err("failed to write stdin")?;

    child
        .wait_with_output()
        .wrap_err("failed to wait for cargo-test-timers")
}

/// Returns stdout of a successful run as a string.
pub(crate) fn success_stdout(output: &Output) -> Result<String> {
    ensure!(
        output.status.success(),
        "cargo-test-timers failed with {}:\n{}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout.clone())?)
}
