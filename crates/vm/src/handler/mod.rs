// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Instruction handlers.
//!
//! Every handler sets the next instruction pointer itself. A handler that
//! returns an error may leave the pointer untouched; the severity router
//! then decides whether execution moves on.

mod branch;
mod buffer;
mod call;
mod jumps;
mod math;
mod memory;
mod scope;
mod subr;

use automa_type::{Result, Value, error::diagnostic::runtime::explicit_fault, return_error};

use crate::{instruction::Instruction, interpreter::Machine};

pub(crate) fn dispatch(vm: &mut Machine, instruction: &Instruction) -> Result<()> {
	match instruction {
		Instruction::Call(name) => call::call(vm, name),
		Instruction::Method {
			instance,
			method,
		} => call::method(vm, instance, method),
		Instruction::Exec(class) => call::exec(vm, class),
		Instruction::ClearBuffer(name) => buffer::clear(vm, name),
		Instruction::Merge(name) => buffer::merge(vm, name),
		Instruction::Reduce(name) => buffer::reduce(vm, name),
		Instruction::Eval(template) => memory::eval(vm, template),
		Instruction::Fetch {
			name,
			optional,
		} => memory::fetch(vm, name, *optional),
		Instruction::Load(literal) => memory::load(vm, literal),
		Instruction::New(name) => memory::new_buffer(vm, name),
		Instruction::Store(name) => memory::store(vm, name),
		Instruction::RightFromLeft => memory::right_from_left(vm),
		Instruction::If {
			target,
			mode,
		} => branch::if_(vm, *target, *mode),
		Instruction::Assert {
			target,
			mode,
		} => branch::assert(vm, *target, *mode),
		Instruction::Jump(target) => jumps::jump(vm, *target),
		Instruction::Goto(target) => jumps::goto(vm, *target),
		Instruction::Math(op) => math::math(vm, *op),
		Instruction::PushScope => scope::push(vm),
		Instruction::PopScope => scope::pop(vm),
		Instruction::SubrCall(name) => subr::call(vm, name, instruction),
		Instruction::Fault => {
			let ip = vm.ip;
			vm.ip += 1;
			return_error!(explicit_fault(&vm.executable.name, ip))
		}
		Instruction::Nop => {
			vm.ip += 1;
			Ok(())
		}
	}
}

/// Registers hold text or buffers only; anything else enters as its text form.
pub(crate) fn register_value(value: Value) -> Value {
	if value.is_register_value() {
		value
	} else {
		Value::Text(value.to_string())
	}
}
