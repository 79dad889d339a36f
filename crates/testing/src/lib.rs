// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shared fixtures for automa integration tests.

pub mod library;
pub mod logging;
pub mod system;
pub mod util;

pub use library::{counter_modules, test_operations};
pub use logging::{LogCapture, init_tracing};
pub use system::TestSystem;
pub use util::{wait_for, wait_for_condition};
