// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Host extension points: library operations and module instances.
//!
//! Operations and methods read their arguments from the VM's memory and
//! return a string that becomes `left`. Failures are returned as regular
//! errors and keep whatever severity the host assigned.

use std::{collections::HashMap, sync::Arc};

use automa_type::{Result, error::diagnostic::runtime::module_not_found, return_error};

use crate::core::Core;

/// A named operation callable with `Call`.
pub trait Operation: Send + Sync {
	fn invoke(&self, core: &mut Core) -> Result<String>;
}

impl<F> Operation for F
where
	F: Fn(&mut Core) -> Result<String> + Send + Sync,
{
	fn invoke(&self, core: &mut Core) -> Result<String> {
		self(core)
	}
}

pub trait OperationLibrary: Send + Sync {
	fn resolve(&self, name: &str) -> Option<Arc<dyn Operation>>;
}

/// A module instance, target of `Method`.
pub trait ModuleHandle: Send + Sync {
	fn class(&self) -> &str;

	fn invoke_method(&self, method: &str, core: &mut Core) -> Result<String>;
}

pub trait ModuleLibrary: Send + Sync {
	/// Well-known instance provided by the host, consulted after persisted storage.
	fn resolve(&self, instance: &str) -> Option<Arc<dyn ModuleHandle>>;

	fn instantiate(&self, class: &str) -> Result<Arc<dyn ModuleHandle>>;
}

/// Operations registered by name.
#[derive(Default)]
pub struct BuiltinRegistry {
	operations: HashMap<String, Arc<dyn Operation>>,
}

impl BuiltinRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, name: impl Into<String>, operation: Arc<dyn Operation>) {
		self.operations.insert(name.into(), operation);
	}

	pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
	where
		F: Fn(&mut Core) -> Result<String> + Send + Sync + 'static,
	{
		self.register(name, Arc::new(f));
	}

	pub fn with_fn<F>(mut self, name: impl Into<String>, f: F) -> Self
	where
		F: Fn(&mut Core) -> Result<String> + Send + Sync + 'static,
	{
		self.register_fn(name, f);
		self
	}

	pub fn len(&self) -> usize {
		self.operations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.operations.is_empty()
	}
}

impl OperationLibrary for BuiltinRegistry {
	fn resolve(&self, name: &str) -> Option<Arc<dyn Operation>> {
		self.operations.get(name).cloned()
	}
}

type ModuleFactory = Box<dyn Fn() -> Arc<dyn ModuleHandle> + Send + Sync>;

/// Module classes by name plus host-provided well-known instances.
#[derive(Default)]
pub struct ModuleRegistry {
	classes: HashMap<String, ModuleFactory>,
	instances: HashMap<String, Arc<dyn ModuleHandle>>,
}

impl ModuleRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register_class<F>(&mut self, class: impl Into<String>, factory: F)
	where
		F: Fn() -> Arc<dyn ModuleHandle> + Send + Sync + 'static,
	{
		self.classes.insert(class.into(), Box::new(factory));
	}

	pub fn register_instance(&mut self, name: impl Into<String>, instance: Arc<dyn ModuleHandle>) {
		self.instances.insert(name.into(), instance);
	}
}

impl ModuleLibrary for ModuleRegistry {
	fn resolve(&self, instance: &str) -> Option<Arc<dyn ModuleHandle>> {
		self.instances.get(instance).cloned()
	}

	fn instantiate(&self, class: &str) -> Result<Arc<dyn ModuleHandle>> {
		match self.classes.get(class) {
			Some(factory) => Ok(factory()),
			None => return_error!(module_not_found(class)),
		}
	}
}
