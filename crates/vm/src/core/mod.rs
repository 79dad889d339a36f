// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Memory of a single VM.
//!
//! A [`Core`] combines three stores with different lifetimes:
//! - scoped storage: shadowing bindings released by scope frames and call returns
//! - persistent storage: objects and module instances living as long as the core
//! - the environment: objects shared with other processes, guarded by owner locks
//!
//! It also caches resolved library operations so repeated calls skip the lookup.

mod environment;
mod persist;
mod scoped;

use std::{collections::HashMap, sync::Arc, time::Duration};

use automa_runtime::{CancellationToken, ContextId};
use automa_type::{Result, Value, error::diagnostic::memory::variable_not_found, return_error};
pub use environment::{EnvStatus, Environment};
pub use persist::{PersistentStorage, Persisted};
pub use scoped::{ScopedStorage, StackEntry};

use crate::library::{Operation, OperationLibrary};

/// Polling interval of cancellable environment waits.
const ENV_WAIT_INTERVAL: Duration = Duration::from_millis(10);

pub struct Core {
	scoped: ScopedStorage,
	persistent: PersistentStorage,
	env: Arc<Environment>,
	calls: HashMap<String, Arc<dyn Operation>>,
	context: ContextId,
	cancel: CancellationToken,
}

impl Core {
	pub fn new(context: ContextId, cancel: CancellationToken, env: Arc<Environment>) -> Self {
		Self {
			scoped: ScopedStorage::new(),
			persistent: PersistentStorage::new(),
			env,
			calls: HashMap::new(),
			context,
			cancel,
		}
	}

	/// A core with its own environment and a fresh context.
	pub fn standalone() -> Self {
		Self::new(ContextId::next(), CancellationToken::new(), Arc::new(Environment::new()))
	}

	pub fn context(&self) -> ContextId {
		self.context
	}

	/// Whether the owning process was killed.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	pub fn environment(&self) -> Arc<Environment> {
		Arc::clone(&self.env)
	}

	/// Copies the visible binding of every name from the parent.
	pub fn inherit(&mut self, parent: &Core) {
		for (name, value) in parent.scoped.visible() {
			self.scoped.store(name, value.clone());
		}
	}

	pub fn store(&mut self, name: impl Into<String>, value: Value) {
		self.scoped.store(name, value);
	}

	pub fn fetch(&self, name: &str) -> Option<&Value> {
		self.scoped.fetch(name)
	}

	pub fn fetch_mut(&mut self, name: &str) -> Option<&mut Value> {
		self.scoped.fetch_mut(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.scoped.contains(name)
	}

	/// Overwrites the innermost binding of an existing name.
	pub fn replace(&mut self, name: &str, value: Value) -> Result<()> {
		if !self.scoped.replace(name, value) {
			return_error!(variable_not_found(name));
		}
		Ok(())
	}

	/// Binds in place when the name is visible, otherwise creates a binding.
	pub fn assign(&mut self, name: &str, value: Value) {
		if let Some(slot) = self.scoped.fetch_mut(name) {
			*slot = value;
		} else {
			self.scoped.store(name, value);
		}
	}

	pub fn remove(&mut self, name: &str) -> Option<Value> {
		self.scoped.remove(name)
	}

	pub fn push_scope_marker(&mut self) {
		self.scoped.push_marker();
	}

	pub fn discard_scope_frame(&mut self) -> Result<usize> {
		self.scoped.discard_frame()
	}

	pub fn scope_depth(&self) -> usize {
		self.scoped.scope_depth()
	}

	pub fn binding_count(&self, name: &str) -> usize {
		self.scoped.binding_count(name)
	}

	pub fn scoped(&self) -> &ScopedStorage {
		&self.scoped
	}

	pub(crate) fn push_entry(&mut self, entry: StackEntry) {
		self.scoped.push_entry(entry);
	}

	pub(crate) fn unwind_entry(&mut self) -> Option<StackEntry> {
		self.scoped.unwind_entry()
	}

	pub fn persist(&mut self, name: impl Into<String>, object: Persisted) -> Option<Persisted> {
		self.persistent.persist(name, object)
	}

	pub fn persisted(&self, name: &str) -> Option<&Persisted> {
		self.persistent.get(name)
	}

	pub fn has_persisted(&self, name: &str) -> bool {
		self.persistent.contains(name)
	}

	pub fn free(&mut self, name: &str) -> Option<Persisted> {
		self.persistent.free(name)
	}

	pub fn env_lock(&self, name: &str) -> bool {
		self.env.lock(name, self.context)
	}

	/// Blocks until the lock is held, giving up when the owning process is killed.
	pub fn env_waiting_lock(&self, name: &str) -> Result<()> {
		self.env.waiting_lock(name, self.context, &self.cancel, ENV_WAIT_INTERVAL)
	}

	pub fn env_unlock(&self, name: &str) -> Result<()> {
		self.env.unlock(name, self.context)
	}

	pub fn env_read(&self, name: &str) -> Result<Value> {
		self.env.read(name, self.context)
	}

	pub fn env_set(&self, name: &str, value: Value) -> Result<()> {
		self.env.set(name, value, self.context)
	}

	pub fn env_test(&self, name: &str) -> EnvStatus {
		self.env.test(name, self.context)
	}

	/// Resolves an operation through the call cache, consulting the library on a miss.
	pub fn resolve_call(&mut self, name: &str, library: &dyn OperationLibrary) -> Option<Arc<dyn Operation>> {
		if let Some(operation) = self.calls.get(name) {
			return Some(Arc::clone(operation));
		}
		let operation = library.resolve(name)?;
		self.calls.insert(name.to_string(), Arc::clone(&operation));
		Some(operation)
	}

	pub fn cached_calls(&self) -> usize {
		self.calls.len()
	}
}
