// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [cargo test-timers](https://crates.io/crates/cargo-test-timers): record
//! how long each test in a run took along with its outcome, then report them fastest first.
//!
//! The entry point is [`recorder::TimingRecorder`], driven by a host test framework through the
//! [`hooks::TestHooks`] callbacks. [`libtest::LibtestEventReader`] adapts libtest's JSON output
//! into those callbacks.

pub mod config;
pub mod errors;
pub mod hooks;
pub mod libtest;
pub mod outcome;
pub mod recorder;
pub mod reporter;
pub mod time;
pub mod write_str;
