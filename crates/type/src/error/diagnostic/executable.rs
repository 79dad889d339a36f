// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::{Severity, error::diagnostic::Diagnostic};

pub fn executable_not_found(name: &str) -> Diagnostic {
	Diagnostic {
		code: "EXEC_001".to_string(),
		severity: Severity::Error,
		message: format!("executable '{}' not found", name),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn decode_failed(name: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "EXEC_002".to_string(),
		severity: Severity::Error,
		message: format!("executable '{}' could not be decoded: {}", name, reason.into()),
		label: None,
		help: Some("the executable was probably produced by an incompatible compiler".to_string()),
		notes: vec![],
	}
}

pub fn encode_failed(name: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "EXEC_003".to_string(),
		severity: Severity::Error,
		message: format!("executable '{}' could not be encoded: {}", name, reason.into()),
		label: None,
		help: None,
		notes: vec![],
	}
}
