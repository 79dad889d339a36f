// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Jump opcodes: Jump, Goto.

use automa_type::{
	Result,
	error::diagnostic::runtime::{jump_out_of_range, self_jump},
	return_error,
};

use crate::{instruction::Instruction, interpreter::Machine};

/// Moves to `target`, which may equal the executable length.
pub(super) fn branch_to(vm: &mut Machine, target: usize) -> Result<()> {
	let len = vm.executable.len();
	if target > len {
		return_error!(jump_out_of_range(target, len));
	}
	vm.ip = target;
	Ok(())
}

/// Jump - unconditional branch, scope frames untouched.
pub fn jump(vm: &mut Machine, target: usize) -> Result<()> {
	branch_to(vm, target)
}

/// Goto - unconditional branch that keeps scope frames balanced.
///
/// Backward, every scope opened in `[target, ip)` and still open is
/// discarded since it will be opened again. Forward, every `PopScope` in
/// `(ip, target)` that closes a scope opened before the jump is skipped,
/// so its frame is discarded here instead.
pub fn goto(vm: &mut Machine, target: usize) -> Result<()> {
	if target == vm.ip {
		return_error!(self_jump(target));
	}
	let len = vm.executable.len();
	if target > len {
		return_error!(jump_out_of_range(target, len));
	}

	let instructions = &vm.executable.instructions;
	let frames = if target < vm.ip {
		unmatched_pushes(&instructions[target..vm.ip])
	} else {
		unmatched_pops(&instructions[vm.ip + 1..target])
	};

	for _ in 0..frames {
		vm.core.discard_scope_frame()?;
	}
	vm.ip = target;
	Ok(())
}

fn unmatched_pushes(range: &[Instruction]) -> usize {
	range.iter().fold(0usize, |open, instruction| match instruction {
		Instruction::PushScope => open + 1,
		Instruction::PopScope => open.saturating_sub(1),
		_ => open,
	})
}

fn unmatched_pops(range: &[Instruction]) -> usize {
	let mut opened = 0usize;
	let mut unmatched = 0usize;
	for instruction in range {
		match instruction {
			Instruction::PushScope => opened += 1,
			Instruction::PopScope if opened > 0 => opened -= 1,
			Instruction::PopScope => unmatched += 1,
			_ => {}
		}
	}
	unmatched
}
