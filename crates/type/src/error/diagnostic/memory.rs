// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::{Severity, error::diagnostic::Diagnostic};

/// Variable is not bound in scoped storage
pub fn variable_not_found(name: &str) -> Diagnostic {
	Diagnostic {
		code: "MEMORY_001".to_string(),
		severity: Severity::Error,
		message: format!("variable '{}' is not defined", name),
		label: None,
		help: Some(format!("store a value in '{}' before using it", name)),
		notes: vec![],
	}
}

/// The scope stack ran out while unwinding: the execution is corrupted
pub fn scope_stack_exhausted(context: &str) -> Diagnostic {
	Diagnostic {
		code: "MEMORY_002".to_string(),
		severity: Severity::Panic,
		message: format!("scope stack exhausted while {}", context),
		label: None,
		help: None,
		notes: vec!["every discarded scope or returning subroutine needs a matching entry on the stack".to_string()],
	}
}

pub fn persisted_not_found(name: &str) -> Diagnostic {
	Diagnostic {
		code: "MEMORY_003".to_string(),
		severity: Severity::Error,
		message: format!("persisted object '{}' does not exist", name),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn buffer_not_found(name: &str) -> Diagnostic {
	Diagnostic {
		code: "MEMORY_004".to_string(),
		severity: Severity::Error,
		message: format!("buffer '{}' is not defined", name),
		label: None,
		help: Some(format!("create the buffer with 'new {}' first", name)),
		notes: vec![],
	}
}

pub fn not_a_buffer(name: &str, kind: &str) -> Diagnostic {
	Diagnostic {
		code: "MEMORY_005".to_string(),
		severity: Severity::Error,
		message: format!("variable '{}' holds a {} value, not a buffer", name, kind),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn env_not_found(name: &str) -> Diagnostic {
	Diagnostic {
		code: "MEMORY_006".to_string(),
		severity: Severity::Error,
		message: format!("environment object '{}' does not exist", name),
		label: None,
		help: None,
		notes: vec![],
	}
}

/// The environment object is locked by another execution context
pub fn env_locked(name: &str) -> Diagnostic {
	Diagnostic {
		code: "MEMORY_007".to_string(),
		severity: Severity::Error,
		message: format!("environment object '{}' is locked by another context", name),
		label: None,
		help: Some("use a waiting lock to block until the owner releases it".to_string()),
		notes: vec![],
	}
}

pub fn env_not_owner(name: &str) -> Diagnostic {
	Diagnostic {
		code: "MEMORY_008".to_string(),
		severity: Severity::Error,
		message: format!("environment object '{}' is not locked by this context", name),
		label: None,
		help: None,
		notes: vec![],
	}
}

/// A waiting lock was interrupted because the owning process was killed
pub fn env_wait_cancelled(name: &str) -> Diagnostic {
	Diagnostic {
		code: "MEMORY_009".to_string(),
		severity: Severity::Fault,
		message: format!("waiting for environment object '{}' was cancelled", name),
		label: None,
		help: None,
		notes: vec![],
	}
}
