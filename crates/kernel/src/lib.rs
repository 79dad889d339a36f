// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! automa kernel - processes and the process table.
//!
//! A [`Process`] is a reusable execution slot with its own thread. It runs
//! one bound VM at a time and is steered from other threads through request
//! flags and a [`SyncGate`](automa_runtime::SyncGate). The [`Kernel`] hands
//! out processes under unique, increasing ids and reaps finished ones.

pub mod config;
mod kernel;
mod process;

pub use config::{KernelConfig, ProcessConfig};
pub use kernel::Kernel;
pub use process::{Pid, Process};
