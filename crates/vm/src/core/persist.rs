// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

use automa_type::Value;

use crate::library::ModuleHandle;

/// An object that outlives scopes: a plain value or a module instance.
#[derive(Clone)]
pub enum Persisted {
	Value(Value),
	Module(Arc<dyn ModuleHandle>),
}

impl Persisted {
	pub fn kind(&self) -> &'static str {
		match self {
			Persisted::Value(value) => value.kind(),
			Persisted::Module(_) => "module",
		}
	}
}

impl Debug for Persisted {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Persisted::Value(value) => f.debug_tuple("Value").field(value).finish(),
			Persisted::Module(module) => f.debug_tuple("Module").field(&module.class()).finish(),
		}
	}
}

/// Name to object storage, unaffected by scope frames.
#[derive(Debug, Default)]
pub struct PersistentStorage {
	objects: HashMap<String, Persisted>,
}

impl PersistentStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores the object, returning whatever was persisted under the name before.
	pub fn persist(&mut self, name: impl Into<String>, object: Persisted) -> Option<Persisted> {
		self.objects.insert(name.into(), object)
	}

	pub fn get(&self, name: &str) -> Option<&Persisted> {
		self.objects.get(name)
	}

	pub fn free(&mut self, name: &str) -> Option<Persisted> {
		self.objects.remove(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.objects.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.objects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.objects.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_persist_and_free() {
		let mut storage = PersistentStorage::new();
		assert!(storage.persist("a", Persisted::Value(Value::text("1"))).is_none());
		let previous = storage.persist("a", Persisted::Value(Value::text("2")));
		assert!(matches!(previous, Some(Persisted::Value(Value::Text(t))) if t == "1"));

		assert_eq!(storage.get("a").map(Persisted::kind), Some("text"));
		assert!(storage.free("a").is_some());
		assert!(!storage.contains("a"));
		assert!(storage.is_empty());
	}
}
