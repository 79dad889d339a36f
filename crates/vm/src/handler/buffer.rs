// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Buffer opcodes: Merge, Reduce, ClearBuffer.

use automa_type::{
	Result, Value, error,
	error::diagnostic::memory::{buffer_not_found, not_a_buffer},
};

use crate::{core::Core, interpreter::Machine};

fn buffer_mut<'a>(core: &'a mut Core, name: &str) -> Result<&'a mut String> {
	match core.fetch_mut(name) {
		Some(Value::Buffer(text)) => Ok(text),
		Some(other) => Err(error!(not_a_buffer(name, other.kind()))),
		None => Err(error!(buffer_not_found(name))),
	}
}

/// Merge - append `left` to the buffer.
pub fn merge(vm: &mut Machine, name: &str) -> Result<()> {
	let text = vm.left.to_string();
	buffer_mut(&mut vm.core, name)?.push_str(&text);
	vm.ip += 1;
	Ok(())
}

/// Reduce - copy the buffer contents into `left` as text.
pub fn reduce(vm: &mut Machine, name: &str) -> Result<()> {
	let text = buffer_mut(&mut vm.core, name)?.clone();
	vm.left = Value::Text(text);
	vm.ip += 1;
	Ok(())
}

pub fn clear(vm: &mut Machine, name: &str) -> Result<()> {
	buffer_mut(&mut vm.core, name)?.clear();
	vm.ip += 1;
	Ok(())
}
