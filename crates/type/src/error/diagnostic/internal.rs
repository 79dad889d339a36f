// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::{Severity, error::diagnostic::Diagnostic};

/// Creates an internal error diagnostic with source location
pub fn internal_with_context(
	reason: impl Into<String>,
	file: &str,
	line: u32,
	column: u32,
	module_path: &str,
) -> Diagnostic {
	let reason = reason.into();
	let location = format!("{}:{}:{}", file.rsplit('/').next().unwrap_or(file), line, column);

	Diagnostic {
		code: "INTERNAL_ERROR".to_string(),
		severity: Severity::Panic,
		message: format!("internal error: {}", reason),
		label: Some(format!("internal invariant violated at {}", location)),
		help: Some("this indicates a corrupted execution rather than a script problem".to_string()),
		notes: vec![format!("module: {}", module_path)],
	}
}

/// Simplified internal error without location
pub fn internal(reason: impl Into<String>) -> Diagnostic {
	internal_with_context(reason, "unknown", 0, 0, "unknown")
}
