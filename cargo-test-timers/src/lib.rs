// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Find out which tests are slow.
//!
//! `cargo test-timers` reads the JSON event stream produced by libtest, records how long each
//! test took along with its outcome, and prints one line per test once the run is over, fastest
//! first:
//!
//! ```text
//! cargo test -- -Z unstable-options --format json | cargo test-timers --with-test-timers
//! ```

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
