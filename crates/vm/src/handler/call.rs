// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Library opcodes: Call, Method, Exec.
//!
//! A failure reported by the library keeps the severity the library gave
//! it. A panic inside the library is caught and reported as a Fault.

use std::{
	any::Any,
	panic::{self, AssertUnwindSafe},
	sync::Arc,
};

use automa_type::{
	Result, Value, error,
	error::diagnostic::runtime::{call_aborted, call_not_found, empty_instance_name, module_not_found, not_a_module},
	return_error,
};
use tracing::trace;

use crate::{
	core::{Core, Persisted},
	interpreter::Machine,
};

pub fn call(vm: &mut Machine, name: &str) -> Result<()> {
	let operation =
		vm.core.resolve_call(name, vm.system.operations()).ok_or_else(|| error!(call_not_found(name)))?;

	vm.ip += 1;
	trace!(pid = vm.pid, call = name, "invoking operation");
	let result = guarded(name, &mut vm.core, |core| operation.invoke(core))?;
	vm.left = Value::Text(result);
	Ok(())
}

/// Method - persisted instances shadow the library's well-known instances.
pub fn method(vm: &mut Machine, instance: &str, method: &str) -> Result<()> {
	let module = match vm.core.persisted(instance) {
		Some(Persisted::Module(module)) => Arc::clone(module),
		Some(other) => return_error!(not_a_module(instance, other.kind())),
		None => vm.system.modules().resolve(instance).ok_or_else(|| error!(module_not_found(instance)))?,
	};

	vm.ip += 1;
	trace!(pid = vm.pid, instance, method, class = module.class(), "invoking method");
	let label = format!("{instance}.{method}");
	let result = guarded(&label, &mut vm.core, |core| module.invoke_method(method, core))?;
	vm.left = Value::Text(result);
	Ok(())
}

/// Exec - instantiate `class` and persist it under the name held in `left`.
pub fn exec(vm: &mut Machine, class: &str) -> Result<()> {
	let name = vm.left.to_string();
	if name.is_empty() {
		return_error!(empty_instance_name(class));
	}

	let module = vm.system.modules().instantiate(class)?;
	vm.core.persist(name, Persisted::Module(module));
	vm.ip += 1;
	Ok(())
}

fn guarded<F>(name: &str, core: &mut Core, f: F) -> Result<String>
where
	F: FnOnce(&mut Core) -> Result<String>,
{
	match panic::catch_unwind(AssertUnwindSafe(|| f(core))) {
		Ok(result) => result,
		Err(payload) => return_error!(call_aborted(name, panic_message(payload.as_ref()))),
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		message.to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic".to_string()
	}
}

#[cfg(test)]
mod tests {
	use automa_type::{Severity, error::diagnostic::internal::internal};

	use super::*;
	use crate::{
		executable::ExecutableBuilder,
		handler::testing::Fixture,
		library::{ModuleHandle, ModuleLibrary},
	};

	struct Counter {
		hits: parking_lot::Mutex<u32>,
	}

	impl ModuleHandle for Counter {
		fn class(&self) -> &str {
			"counter"
		}

		fn invoke_method(&self, method: &str, _core: &mut Core) -> Result<String> {
			match method {
				"inc" => {
					let mut hits = self.hits.lock();
					*hits += 1;
					Ok(hits.to_string())
				}
				_ => return_error!(call_not_found(method)),
			}
		}
	}

	fn fixture() -> Fixture {
		let mut fixture = Fixture::new();
		fixture.operations.register_fn("greet", |core: &mut Core| {
			let who = core.fetch("who").map(Value::to_string).unwrap_or_default();
			Ok(format!("hello {who}"))
		});
		fixture.operations.register_fn("boom", |_: &mut Core| -> Result<String> { panic!("exploded") });
		fixture.operations.register_fn("broken", |_: &mut Core| -> Result<String> {
			Err(automa_type::Error::new(internal("library state lost").with_severity(Severity::Error)))
		});
		fixture.modules.register_class("counter", || {
			Arc::new(Counter {
				hits: parking_lot::Mutex::new(0),
			}) as Arc<dyn ModuleHandle>
		});
		fixture
	}

	fn machine() -> Machine {
		fixture().machine(ExecutableBuilder::new("main").nop().nop().build()).0
	}

	#[test]
	fn test_call_sets_left() {
		let mut vm = machine();
		vm.core.store("who", Value::text("world"));
		call(&mut vm, "greet").unwrap();
		assert_eq!(vm.left, Value::text("hello world"));
		assert_eq!(vm.ip, 1);
	}

	#[test]
	fn test_call_unknown() {
		let mut vm = machine();
		let err = call(&mut vm, "nope").unwrap_err();
		assert_eq!(err.code(), "VM_001");
		assert_eq!(vm.ip, 0);
	}

	#[test]
	fn test_call_panic_becomes_fault() {
		let mut vm = machine();
		let err = call(&mut vm, "boom").unwrap_err();
		assert_eq!(err.code(), "VM_012");
		assert_eq!(err.severity(), Severity::Fault);
		assert!(err.message.contains("exploded"));
	}

	#[test]
	fn test_call_failure_keeps_severity() {
		let mut vm = machine();
		let err = call(&mut vm, "broken").unwrap_err();
		assert_eq!(err.severity(), Severity::Error);
		assert_eq!(vm.ip, 1);
	}

	#[test]
	fn test_exec_then_method() {
		let mut vm = machine();
		vm.left = Value::text("c1");
		exec(&mut vm, "counter").unwrap();
		assert!(matches!(vm.core.persisted("c1"), Some(Persisted::Module(_))));

		method(&mut vm, "c1", "inc").unwrap();
		method(&mut vm, "c1", "inc").unwrap();
		assert_eq!(vm.left, Value::text("2"));
	}

	#[test]
	fn test_exec_requires_name() {
		let mut vm = machine();
		let err = exec(&mut vm, "counter").unwrap_err();
		assert_eq!(err.code(), "VM_014");
	}

	#[test]
	fn test_method_on_plain_value() {
		let mut vm = machine();
		vm.core.persist("plain", Persisted::Value(Value::text("x")));
		let err = method(&mut vm, "plain", "inc").unwrap_err();
		assert_eq!(err.code(), "VM_016");
	}

	#[test]
	fn test_method_falls_back_to_library_instance() {
		let mut fixture = fixture();
		let shared = fixture.modules.instantiate("counter").unwrap();
		fixture.modules.register_instance("global", shared);
		let (mut vm, _) = fixture.machine(ExecutableBuilder::new("main").nop().build());

		method(&mut vm, "global", "inc").unwrap();
		assert_eq!(vm.left, Value::text("1"));
		assert_eq!(method(&mut vm, "missing", "inc").unwrap_err().code(), "VM_002");
	}
}
