// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Types shared by every automa crate.
//!
//! - [`Value`]: what scripts store in memory and carry in the working registers
//! - [`Severity`]: the five-level escalation taxonomy every condition is classified into
//! - [`Diagnostic`] / [`Error`]: the typed condition returned (never thrown) by the core

pub mod error;
pub mod value;

pub use error::{Error, Result, diagnostic::Diagnostic, severity::Severity};
pub use value::Value;
