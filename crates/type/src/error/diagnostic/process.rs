// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::{Severity, error::diagnostic::Diagnostic};

/// The VM bound to a process terminated because of a condition it could not recover from
pub fn vm_terminated(pid: u64, cause: &Diagnostic) -> Diagnostic {
	Diagnostic {
		code: "PROCESS_001".to_string(),
		severity: cause.severity,
		message: format!("process {} terminated its vm: {}", pid, cause.message),
		label: Some(format!("caused by {}", cause.code)),
		help: None,
		notes: vec!["the process survives and can execute another vm".to_string()],
	}
}

pub fn process_killed(pid: u64) -> Diagnostic {
	Diagnostic {
		code: "PROCESS_002".to_string(),
		severity: Severity::Warning,
		message: format!("process {} was killed", pid),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn spawn_failed(pid: u64, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "PROCESS_003".to_string(),
		severity: Severity::Panic,
		message: format!("failed to spawn thread for process {}: {}", pid, reason.into()),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn attach_failed(pid: u64, cause: &Diagnostic) -> Diagnostic {
	Diagnostic {
		code: "PROCESS_004".to_string(),
		severity: Severity::Error,
		message: format!("process {} could not attach vm: {}", pid, cause.message),
		label: Some(format!("caused by {}", cause.code)),
		help: None,
		notes: vec![],
	}
}
