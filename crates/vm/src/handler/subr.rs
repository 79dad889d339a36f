// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SubrCall - enter another executable.
//!
//! The call frame is pushed onto the scope stack as the output placeholder
//! (when the callee declares one), then `Subr`, `ReturnIp`, `Caller`. The
//! return path runs when the callee's ip passes its last instruction.

use std::{mem, sync::Arc};

use automa_type::{
	Result, Value, error,
	error::diagnostic::runtime::{call_depth_exceeded, subroutine_not_loaded},
	return_error,
};
use tracing::debug;

use crate::{core::StackEntry, instruction::Instruction, interpreter::Machine};

pub fn call(vm: &mut Machine, name: &str, instruction: &Instruction) -> Result<()> {
	if vm.depth >= vm.system.config().max_call_depth {
		return_error!(call_depth_exceeded(vm.depth + 1));
	}

	let callee = vm
		.system
		.executables()
		.get(name)
		.map_err(|err| error!(subroutine_not_loaded(name, err.message.clone())))?;

	if let Some(output) = &callee.output_var {
		vm.core.store(output.clone(), Value::Undefined);
	}
	vm.core.push_entry(StackEntry::Subr(instruction.clone()));
	vm.core.push_entry(StackEntry::ReturnIp(vm.ip + 1));

	debug!(pid = vm.pid, caller = %vm.executable.name, callee = %callee.name, depth = vm.depth + 1, "subroutine call");
	let caller = mem::replace(&mut vm.executable, Arc::clone(&callee));
	vm.core.push_entry(StackEntry::Caller(caller));
	vm.ip = 0;
	vm.depth += 1;
	Ok(())
}

#[cfg(test)]
mod tests {
	use automa_type::Severity;

	use super::*;
	use crate::{executable::ExecutableBuilder, handler::testing::Fixture};

	#[test]
	fn test_frame_layout() {
		let callee = ExecutableBuilder::new("callee").output("r").nop().build();
		let (mut vm, _) =
			Fixture::new().with_executable(&callee).machine(ExecutableBuilder::new("main").subr_call("callee").build());
		let instruction = Instruction::SubrCall("callee".to_string());

		call(&mut vm, "callee", &instruction).unwrap();

		assert_eq!(vm.ip, 0);
		assert_eq!(vm.depth, 1);
		assert_eq!(vm.executable.name, "callee");
		assert_eq!(vm.core.fetch("r"), Some(&Value::Undefined));

		assert!(matches!(vm.core.unwind_entry(), Some(StackEntry::Caller(exe)) if exe.name == "main"));
		assert!(matches!(vm.core.unwind_entry(), Some(StackEntry::ReturnIp(1))));
		assert!(matches!(vm.core.unwind_entry(), Some(StackEntry::Subr(i)) if i == instruction));
		assert!(matches!(vm.core.unwind_entry(), Some(StackEntry::Local(name)) if name == "r"));
		assert!(matches!(vm.core.unwind_entry(), Some(StackEntry::Bottom)));
	}

	#[test]
	fn test_unknown_subroutine_is_fault() {
		let (mut vm, _) = Fixture::new().machine(ExecutableBuilder::new("main").subr_call("ghost").build());
		let err = call(&mut vm, "ghost", &Instruction::SubrCall("ghost".to_string())).unwrap_err();
		assert_eq!(err.code(), "VM_008");
		assert_eq!(err.severity(), Severity::Fault);
		assert_eq!(vm.depth, 0);
	}

	#[test]
	fn test_depth_limit() {
		let callee = ExecutableBuilder::new("callee").build();
		let (mut vm, _) =
			Fixture::new().with_executable(&callee).machine(ExecutableBuilder::new("main").subr_call("callee").build());
		vm.depth = vm.system.config().max_call_depth;

		let err = call(&mut vm, "callee", &Instruction::SubrCall("callee".to_string())).unwrap_err();
		assert_eq!(err.code(), "VM_013");
	}
}
