// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Escalation level of a condition, in ascending order.
///
/// - `Informational` / `Warning`: recorded, execution continues unaffected
/// - `Error`: recorded, the interpreter guarantees forward progress
/// - `Fault`: unwinds the nearest subroutine and resumes its caller
/// - `Panic`: terminates the VM
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
	Informational,
	Warning,
	Error,
	Fault,
	Panic,
}

impl Severity {
	/// Whether a condition of this severity leaves the current routine.
	pub fn is_fatal(self) -> bool {
		self >= Severity::Fault
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Severity::Informational => "info",
			Severity::Warning => "warning",
			Severity::Error => "error",
			Severity::Fault => "fault",
			Severity::Panic => "panic",
		}
	}
}

impl Display for Severity {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
