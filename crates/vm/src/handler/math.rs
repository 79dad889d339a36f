// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cmp::Ordering;

use automa_type::{Result, Value, error::diagnostic::runtime::divide_by_zero, return_error};

use crate::{instruction::MathOp, interpreter::Machine};

/// Math - `left <op> right` into `left`.
///
/// With both registers integral the operation wraps on overflow. Otherwise
/// the registers are compared as strings and `left` becomes -1, 0 or 1.
pub fn math(vm: &mut Machine, op: MathOp) -> Result<()> {
	vm.ip += 1;

	let result = match (vm.left.to_integer(), vm.right.to_integer()) {
		(Some(left), Some(right)) => match op {
			MathOp::Add => left.wrapping_add(right),
			MathOp::Subtract | MathOp::Equal => left.wrapping_sub(right),
			MathOp::Multiply => left.wrapping_mul(right),
			MathOp::Divide => {
				if right == 0 {
					vm.left = Value::text("0");
					return_error!(divide_by_zero());
				}
				left.wrapping_div(right)
			}
		},
		_ => match vm.left.to_string().cmp(&vm.right.to_string()) {
			Ordering::Less => -1,
			Ordering::Equal => 0,
			Ordering::Greater => 1,
		},
	};

	vm.left = Value::Text(result.to_string());
	Ok(())
}
