// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::severity::Severity;

pub mod executable;
pub mod internal;
pub mod memory;
pub mod process;
pub mod runtime;

/// A classified condition: what went wrong, how bad it is, and a stable code to identify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub severity: Severity,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
}

impl Diagnostic {
	/// Re-classifies the diagnostic, e.g. when a collaborator failure escalates.
	pub fn with_severity(mut self, severity: Severity) -> Self {
		self.severity = severity;
		self
	}

	pub fn with_note(mut self, note: impl Into<String>) -> Self {
		self.notes.push(note.into());
		self
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
		if let Some(label) = &self.label {
			write!(f, " ({})", label)?;
		}
		Ok(())
	}
}
