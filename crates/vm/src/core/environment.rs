// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Environment objects: named values shared between processes.
//!
//! Every object is guarded by an [`OwnerMutex`] keyed by execution context.
//! A context that holds the lock may read and write the object; while the
//! lock is free anyone may. Locks are reentrant per context.

use std::{collections::HashMap, sync::Arc, time::Duration};

use automa_runtime::{CancellationToken, ContextId, sync::OwnerMutex};
use automa_type::{
	Result, Value,
	error::diagnostic::memory::{env_locked, env_not_found, env_not_owner, env_wait_cancelled},
	return_error,
};
use parking_lot::{Mutex, RwLock};

/// Outcome of [`Environment::test`] from the asking context's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvStatus {
	Missing,
	Unlocked,
	OwnedBySelf,
	OwnedByOther,
}

#[derive(Default)]
struct EnvObject {
	lock: OwnerMutex,
	value: Mutex<Value>,
}

impl EnvObject {
	fn accessible_by(&self, context: ContextId) -> bool {
		self.lock.owner().is_none_or(|owner| owner == context)
	}
}

#[derive(Default)]
pub struct Environment {
	objects: RwLock<HashMap<String, Arc<EnvObject>>>,
}

impl Environment {
	pub fn new() -> Self {
		Self::default()
	}

	fn get(&self, name: &str) -> Option<Arc<EnvObject>> {
		self.objects.read().get(name).cloned()
	}

	fn get_or_create(&self, name: &str) -> Arc<EnvObject> {
		if let Some(object) = self.get(name) {
			return object;
		}
		Arc::clone(self.objects.write().entry(name.to_string()).or_default())
	}

	/// Takes the lock without blocking, creating the object if needed.
	pub fn lock(&self, name: &str, context: ContextId) -> bool {
		self.get_or_create(name).lock.try_lock(context)
	}

	/// Blocks until the lock is taken or the token is cancelled.
	pub fn waiting_lock(
		&self,
		name: &str,
		context: ContextId,
		token: &CancellationToken,
		interval: Duration,
	) -> Result<()> {
		let object = self.get_or_create(name);
		if object.lock.lock_until(context, token, interval) {
			Ok(())
		} else {
			return_error!(env_wait_cancelled(name))
		}
	}

	pub fn unlock(&self, name: &str, context: ContextId) -> Result<()> {
		let Some(object) = self.get(name) else {
			return_error!(env_not_found(name));
		};
		if !object.lock.unlock(context) {
			return_error!(env_not_owner(name));
		}
		Ok(())
	}

	pub fn read(&self, name: &str, context: ContextId) -> Result<Value> {
		let Some(object) = self.get(name) else {
			return_error!(env_not_found(name));
		};
		if !object.accessible_by(context) {
			return_error!(env_locked(name));
		}
		Ok(object.value.lock().clone())
	}

	/// Writes the value, creating the object when it does not exist.
	pub fn set(&self, name: &str, value: Value, context: ContextId) -> Result<()> {
		let object = self.get_or_create(name);
		if !object.accessible_by(context) {
			return_error!(env_locked(name));
		}
		*object.value.lock() = value;
		Ok(())
	}

	pub fn test(&self, name: &str, context: ContextId) -> EnvStatus {
		let Some(object) = self.get(name) else {
			return EnvStatus::Missing;
		};
		match object.lock.owner() {
			None => EnvStatus::Unlocked,
			Some(owner) if owner == context => EnvStatus::OwnedBySelf,
			Some(_) => EnvStatus::OwnedByOther,
		}
	}

	pub fn contains(&self, name: &str) -> bool {
		self.objects.read().contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.objects.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.objects.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::mpsc, thread};

	use super::*;

	#[test]
	fn test_lock_and_test() {
		let env = Environment::new();
		let a = ContextId::next();
		let b = ContextId::next();

		assert_eq!(env.test("obj", a), EnvStatus::Missing);
		assert!(env.lock("obj", a));
		assert_eq!(env.test("obj", a), EnvStatus::OwnedBySelf);
		assert_eq!(env.test("obj", b), EnvStatus::OwnedByOther);
		assert!(!env.lock("obj", b));

		env.unlock("obj", a).unwrap();
		assert_eq!(env.test("obj", b), EnvStatus::Unlocked);
	}

	#[test]
	fn test_locked_object_rejects_others() {
		let env = Environment::new();
		let a = ContextId::next();
		let b = ContextId::next();

		env.set("obj", Value::text("v1"), a).unwrap();
		assert!(env.lock("obj", a));

		assert_eq!(env.read("obj", b).unwrap_err().code(), "MEMORY_007");
		assert_eq!(env.set("obj", Value::text("v2"), b).unwrap_err().code(), "MEMORY_007");
		assert_eq!(env.unlock("obj", b).unwrap_err().code(), "MEMORY_008");

		env.set("obj", Value::text("v2"), a).unwrap();
		assert_eq!(env.read("obj", a).unwrap(), Value::text("v2"));
	}

	#[test]
	fn test_missing_object() {
		let env = Environment::new();
		let ctx = ContextId::next();
		assert_eq!(env.read("nope", ctx).unwrap_err().code(), "MEMORY_006");
		assert_eq!(env.unlock("nope", ctx).unwrap_err().code(), "MEMORY_006");
	}

	#[test]
	fn test_waiting_lock_acquires_after_release() {
		let env = Arc::new(Environment::new());
		let holder = ContextId::next();
		assert!(env.lock("obj", holder));

		let (tx, rx) = mpsc::channel();
		let waiter = {
			let env = Arc::clone(&env);
			thread::spawn(move || {
				let ctx = ContextId::next();
				let token = CancellationToken::new();
				let result = env.waiting_lock("obj", ctx, &token, Duration::from_millis(5));
				tx.send(result.is_ok()).unwrap();
				ctx
			})
		};

		assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
		env.unlock("obj", holder).unwrap();
		assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap());

		let waiter_ctx = waiter.join().unwrap();
		assert_eq!(env.test("obj", waiter_ctx), EnvStatus::OwnedBySelf);
	}

	#[test]
	fn test_waiting_lock_cancelled() {
		let env = Environment::new();
		assert!(env.lock("obj", ContextId::next()));

		let token = CancellationToken::new();
		token.cancel();
		let err = env.waiting_lock("obj", ContextId::next(), &token, Duration::from_millis(5)).unwrap_err();
		assert_eq!(err.code(), "MEMORY_009");
	}
}
