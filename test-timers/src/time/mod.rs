// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Clocks and stopwatches used to time tests.

mod clock;
mod stopwatch;

pub use clock::*;
pub(crate) use stopwatch::*;
