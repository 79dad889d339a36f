// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Register and variable opcodes: Load, Eval, Fetch, Store, New, RightFromLeft.

use automa_type::{
	Result, Value,
	error::diagnostic::{
		memory::variable_not_found,
		runtime::{eval_variable_not_found, illegal_fetch_type},
	},
	return_error,
};

use super::register_value;
use crate::interpreter::Machine;

pub fn load(vm: &mut Machine, literal: &str) -> Result<()> {
	vm.left = Value::text(literal);
	vm.ip += 1;
	Ok(())
}

/// Eval - expand `${name}` references against scoped storage.
///
/// Unknown names expand to nothing; the result still lands in `left` and
/// the first unknown name is reported.
pub fn eval(vm: &mut Machine, template: &str) -> Result<()> {
	let mut out = String::with_capacity(template.len());
	let mut missing: Option<&str> = None;
	let mut rest = template;

	while let Some(start) = rest.find("${") {
		out.push_str(&rest[..start]);
		let reference = &rest[start + 2..];
		let Some(end) = reference.find('}') else {
			out.push_str(&rest[start..]);
			rest = "";
			break;
		};

		let name = &reference[..end];
		match vm.core.fetch(name) {
			Some(value) => out.push_str(&value.to_string()),
			None => {
				missing.get_or_insert(name);
			}
		}
		rest = &reference[end + 1..];
	}
	out.push_str(rest);

	vm.left = Value::Text(out);
	vm.ip += 1;
	if let Some(name) = missing {
		return_error!(eval_variable_not_found(name));
	}
	Ok(())
}

/// Fetch - copy a text or buffer variable into `left`.
pub fn fetch(vm: &mut Machine, name: &str, optional: bool) -> Result<()> {
	match vm.core.fetch(name) {
		Some(value) if value.is_register_value() => {
			vm.left = value.clone();
			vm.ip += 1;
			Ok(())
		}
		Some(value) => {
			let kind = value.kind();
			vm.ip += 1;
			return_error!(illegal_fetch_type(name, kind))
		}
		None if optional => {
			vm.left = Value::Undefined;
			vm.ip += 1;
			Ok(())
		}
		None => return_error!(variable_not_found(name)),
	}
}

pub fn store(vm: &mut Machine, name: &str) -> Result<()> {
	vm.core.assign(name, register_value(vm.left.clone()));
	vm.ip += 1;
	Ok(())
}

/// New - bind an empty buffer, shadowing any visible binding.
pub fn new_buffer(vm: &mut Machine, name: &str) -> Result<()> {
	vm.core.store(name, Value::buffer(""));
	vm.ip += 1;
	Ok(())
}

pub fn right_from_left(vm: &mut Machine) -> Result<()> {
	vm.right = vm.left.clone();
	vm.ip += 1;
	Ok(())
}
