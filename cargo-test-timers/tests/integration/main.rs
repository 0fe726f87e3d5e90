// Copyright (c) The test-timers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod cli;
mod fixtures;
mod transcript;
