// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use automa_type::{Diagnostic, Error, Result};
use dashmap::DashMap;
use tracing::{debug, trace};

use super::{Executable, ExecutableLoader};

/// Resolves executables by name, loading each at most once per
/// invalidation and sharing the decoded form between callers.
pub struct ExecutableCache {
	loader: Arc<dyn ExecutableLoader>,
	entries: DashMap<String, Arc<Executable>>,
}

impl ExecutableCache {
	pub fn new(loader: Arc<dyn ExecutableLoader>) -> Self {
		Self {
			loader,
			entries: DashMap::new(),
		}
	}

	pub fn get(&self, name: &str) -> Result<Arc<Executable>> {
		if let Some(entry) = self.entries.get(name) {
			trace!(executable = name, "executable cache hit");
			return Ok(Arc::clone(entry.value()));
		}

		let executable = self.loader.load(name).map_err(|err| Error::new(Diagnostic::from(err)))?;
		debug!(executable = name, instructions = executable.len(), "executable loaded");

		let executable = Arc::new(executable);
		self.entries.insert(name.to_string(), Arc::clone(&executable));
		Ok(executable)
	}

	/// Drops the cached copy so the next `get` reloads it.
	pub fn invalidate(&self, name: &str) -> bool {
		self.entries.remove(name).is_some()
	}

	pub fn clear(&self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
