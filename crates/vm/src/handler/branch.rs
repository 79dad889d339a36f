// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Conditional opcodes: If, Assert. Both fall through when the test holds.

use automa_type::Result;

use super::jumps::branch_to;
use crate::{
	instruction::{AssertMode, IfMode},
	interpreter::Machine,
};

/// If - compare `left` as an integer against zero; unparsable counts as non-zero.
pub fn if_(vm: &mut Machine, target: usize, mode: IfMode) -> Result<()> {
	let value = vm.left.to_integer().unwrap_or(1);
	if mode.holds(value) {
		vm.ip += 1;
		Ok(())
	} else {
		branch_to(vm, target)
	}
}

pub fn assert(vm: &mut Machine, target: usize, mode: AssertMode) -> Result<()> {
	if mode.holds(vm.left.is_empty()) {
		vm.ip += 1;
		Ok(())
	} else {
		branch_to(vm, target)
	}
}

#[cfg(test)]
mod tests {
	use automa_type::Value;

	use super::*;
	use crate::handler::testing::machine;

	fn program() -> Machine {
		machine(|b| b.nop().nop().nop().nop())
	}

	#[test]
	fn test_if_falls_through_when_holding() {
		let mut vm = program();
		vm.left = Value::text("-3");
		if_(&mut vm, 3, IfMode::LessEqualZero).unwrap();
		assert_eq!(vm.ip, 1);
	}

	#[test]
	fn test_if_branches_when_failing() {
		let mut vm = program();
		vm.left = Value::text("5");
		if_(&mut vm, 3, IfMode::EqualZero).unwrap();
		assert_eq!(vm.ip, 3);
	}

	#[test]
	fn test_if_unparsable_is_non_zero() {
		let mut vm = program();
		vm.left = Value::text("x");
		if_(&mut vm, 2, IfMode::NotZero).unwrap();
		assert_eq!(vm.ip, 1);
	}

	#[test]
	fn test_assert_empty() {
		let mut vm = program();
		vm.left = Value::Undefined;
		assert(&mut vm, 3, AssertMode::Empty).unwrap();
		assert_eq!(vm.ip, 1);

		vm.left = Value::text("full");
		assert(&mut vm, 3, AssertMode::Empty).unwrap();
		assert_eq!(vm.ip, 3);
	}

	#[test]
	fn test_branch_out_of_range() {
		let mut vm = program();
		vm.left = Value::text("1");
		let err = if_(&mut vm, 9, IfMode::EqualZero).unwrap_err();
		assert_eq!(err.code(), "VM_006");
	}
}
