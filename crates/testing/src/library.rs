// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Scripted operations and modules.
//!
//! Operations take their arguments from variables: `arg` for the value to
//! work on, `ms` for durations, `obj` for environment object names.

use std::{sync::Arc, thread, time::Duration};

use automa_type::{
	Error, Result, Severity, Value,
	error::diagnostic::{internal::internal, runtime::call_not_found},
	return_error,
};
use automa_vm::{BuiltinRegistry, Core, ModuleHandle, ModuleRegistry};
use parking_lot::Mutex;

fn arg(core: &Core, name: &str) -> String {
	core.fetch(name).map(Value::to_string).unwrap_or_default()
}

fn failure(message: &str, severity: Severity) -> Error {
	Error::new(internal(message).with_severity(severity))
}

pub fn test_operations() -> BuiltinRegistry {
	BuiltinRegistry::new()
		.with_fn("echo", |core: &mut Core| Ok(arg(core, "arg")))
		.with_fn("upper", |core: &mut Core| Ok(arg(core, "arg").to_uppercase()))
		.with_fn("warn", |_: &mut Core| Err(failure("scripted warning", Severity::Warning)))
		.with_fn("fail", |_: &mut Core| Err(failure("scripted error", Severity::Error)))
		.with_fn("fault", |_: &mut Core| Err(failure("scripted fault", Severity::Fault)))
		.with_fn("panic", |_: &mut Core| -> Result<String> { panic!("scripted panic") })
		.with_fn("sleep", |core: &mut Core| {
			let ms = core.fetch("ms").and_then(Value::to_integer).unwrap_or(10);
			thread::sleep(Duration::from_millis(ms.max(0) as u64));
			Ok(String::new())
		})
		.with_fn("env_set", |core: &mut Core| {
			core.env_set(&arg(core, "obj"), Value::text(arg(core, "arg")))?;
			Ok(String::new())
		})
		.with_fn("env_read", |core: &mut Core| Ok(core.env_read(&arg(core, "obj"))?.to_string()))
		.with_fn("env_lock", |core: &mut Core| Ok(core.env_lock(&arg(core, "obj")).to_string()))
		.with_fn("env_wait", |core: &mut Core| {
			core.env_waiting_lock(&arg(core, "obj"))?;
			Ok("locked".to_string())
		})
		.with_fn("env_unlock", |core: &mut Core| {
			core.env_unlock(&arg(core, "obj"))?;
			Ok(String::new())
		})
}

/// A module counting `inc` calls.
pub struct Counter {
	hits: Mutex<i64>,
}

impl Counter {
	pub fn new() -> Self {
		Self {
			hits: Mutex::new(0),
		}
	}
}

impl Default for Counter {
	fn default() -> Self {
		Self::new()
	}
}

impl ModuleHandle for Counter {
	fn class(&self) -> &str {
		"counter"
	}

	fn invoke_method(&self, method: &str, _core: &mut Core) -> Result<String> {
		let mut hits = self.hits.lock();
		match method {
			"inc" => {
				*hits += 1;
				Ok(hits.to_string())
			}
			"get" => Ok(hits.to_string()),
			_ => return_error!(call_not_found(method)),
		}
	}
}

/// Registry with the `counter` class and a well-known `shared` counter.
pub fn counter_modules() -> ModuleRegistry {
	let mut registry = ModuleRegistry::new();
	registry.register_class("counter", || Arc::new(Counter::new()) as Arc<dyn ModuleHandle>);
	registry.register_instance("shared", Arc::new(Counter::new()));
	registry
}
