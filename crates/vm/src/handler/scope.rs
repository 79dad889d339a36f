// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Scope opcodes: PushScope, PopScope.

use automa_type::Result;

use crate::interpreter::Machine;

pub fn push(vm: &mut Machine) -> Result<()> {
	vm.core.push_scope_marker();
	vm.ip += 1;
	Ok(())
}

pub fn pop(vm: &mut Machine) -> Result<()> {
	vm.core.discard_scope_frame()?;
	vm.ip += 1;
	Ok(())
}
