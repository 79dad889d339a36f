// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::{Severity, error::diagnostic::Diagnostic};

/// No built-in operation is registered under the given name
pub fn call_not_found(name: &str) -> Diagnostic {
	Diagnostic {
		code: "VM_001".to_string(),
		severity: Severity::Error,
		message: format!("call '{}' is not defined", name),
		label: None,
		help: Some("check the spelling of the call or register it with the operation library".to_string()),
		notes: vec![],
	}
}

/// Neither a persisted instance nor the module library knows the instance
pub fn module_not_found(instance: &str) -> Diagnostic {
	Diagnostic {
		code: "VM_002".to_string(),
		severity: Severity::Error,
		message: format!("module instance '{}' is not defined", instance),
		label: None,
		help: Some(format!("create the instance with 'exec' before calling methods on '{}'", instance)),
		notes: vec![],
	}
}

/// Fetch only loads text or buffer values into the working register
pub fn illegal_fetch_type(name: &str, kind: &str) -> Diagnostic {
	Diagnostic {
		code: "VM_003".to_string(),
		severity: Severity::Warning,
		message: format!("variable '{}' holds a {} value which cannot be fetched", name, kind),
		label: Some("register left unchanged".to_string()),
		help: None,
		notes: vec!["only text and buffer values can be loaded into a register".to_string()],
	}
}

/// A `${name}` reference in an evaluated literal could not be resolved
pub fn eval_variable_not_found(name: &str) -> Diagnostic {
	Diagnostic {
		code: "VM_004".to_string(),
		severity: Severity::Error,
		message: format!("variable '{}' referenced in literal is not defined", name),
		label: Some("substituted with an empty string".to_string()),
		help: None,
		notes: vec![],
	}
}

/// Goto targeting its own instruction would never make progress
pub fn self_jump(ip: usize) -> Diagnostic {
	Diagnostic {
		code: "VM_005".to_string(),
		severity: Severity::Fault,
		message: format!("goto at instruction {} targets itself", ip),
		label: None,
		help: None,
		notes: vec!["a jump to the same instruction would loop forever".to_string()],
	}
}

pub fn jump_out_of_range(target: usize, len: usize) -> Diagnostic {
	Diagnostic {
		code: "VM_006".to_string(),
		severity: Severity::Fault,
		message: format!("jump target {} is outside of the executable ({} instructions)", target, len),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn divide_by_zero() -> Diagnostic {
	Diagnostic {
		code: "VM_007".to_string(),
		severity: Severity::Error,
		message: "division by zero".to_string(),
		label: Some("result forced to 0".to_string()),
		help: None,
		notes: vec![],
	}
}

/// The executable named by a subroutine call could not be loaded
pub fn subroutine_not_loaded(name: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "VM_008".to_string(),
		severity: Severity::Fault,
		message: format!("cannot call subroutine '{}': {}", name, reason.into()),
		label: None,
		help: None,
		notes: vec![],
	}
}

/// The callee declared an output variable but its binding is gone on return
pub fn missing_output(executable: &str, variable: &str) -> Diagnostic {
	Diagnostic {
		code: "VM_009".to_string(),
		severity: Severity::Warning,
		message: format!("subroutine '{}' returned without output variable '{}'", executable, variable),
		label: Some("result defaults to empty".to_string()),
		help: None,
		notes: vec![],
	}
}

/// Raised by the `fault` instruction
pub fn explicit_fault(executable: &str, ip: usize) -> Diagnostic {
	Diagnostic {
		code: "VM_010".to_string(),
		severity: Severity::Fault,
		message: format!("fault raised by '{}' at instruction {}", executable, ip),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn runaway(executable: &str, ip: usize) -> Diagnostic {
	Diagnostic {
		code: "VM_011".to_string(),
		severity: Severity::Error,
		message: format!("instruction {} of '{}' executed twice in succession", ip, executable),
		label: Some("instruction pointer force-advanced".to_string()),
		help: None,
		notes: vec![],
	}
}

/// A built-in operation failed in a way it did not report itself
pub fn call_aborted(name: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "VM_012".to_string(),
		severity: Severity::Fault,
		message: format!("call '{}' aborted: {}", name, reason.into()),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn call_depth_exceeded(depth: usize) -> Diagnostic {
	Diagnostic {
		code: "VM_013".to_string(),
		severity: Severity::Fault,
		message: format!("subroutine nesting exceeds the maximum depth of {}", depth),
		label: None,
		help: Some("raise VmConfig::max_call_depth or check for unbounded recursion".to_string()),
		notes: vec![],
	}
}

pub fn empty_instance_name(class: &str) -> Diagnostic {
	Diagnostic {
		code: "VM_014".to_string(),
		severity: Severity::Error,
		message: format!("cannot create an instance of '{}' without a name", class),
		label: None,
		help: Some("load the instance name into the register before 'exec'".to_string()),
		notes: vec![],
	}
}

/// The interpreter was stepped outside of its running lifecycle
pub fn not_running(state: &str) -> Diagnostic {
	Diagnostic {
		code: "VM_015".to_string(),
		severity: Severity::Panic,
		message: format!("interpreter cannot execute in state {}", state),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn not_a_module(instance: &str, kind: &str) -> Diagnostic {
	Diagnostic {
		code: "VM_016".to_string(),
		severity: Severity::Error,
		message: format!("persisted object '{}' is a {} and has no methods", instance, kind),
		label: None,
		help: None,
		notes: vec![],
	}
}

pub fn not_attached() -> Diagnostic {
	Diagnostic {
		code: "VM_017".to_string(),
		severity: Severity::Panic,
		message: "interpreter must be attached to a process before it is started".to_string(),
		label: None,
		help: None,
		notes: vec![],
	}
}
