// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashMap;

use automa_type::{
	Diagnostic, Result,
	error::diagnostic::executable::{decode_failed, executable_not_found},
};
use parking_lot::RwLock;

use super::Executable;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
	#[error("executable '{0}' not found")]
	NotFound(String),
	#[error("executable '{name}' could not be decoded: {reason}")]
	Corrupt {
		name: String,
		reason: String,
	},
}

impl From<LoadError> for Diagnostic {
	fn from(err: LoadError) -> Self {
		match err {
			LoadError::NotFound(name) => executable_not_found(&name),
			LoadError::Corrupt {
				name,
				reason,
			} => decode_failed(&name, reason),
		}
	}
}

/// Source of executables by name.
pub trait ExecutableLoader: Send + Sync {
	fn load(&self, name: &str) -> std::result::Result<Executable, LoadError>;
}

/// Loader over postcard encoded executables held in memory.
#[derive(Debug, Default)]
pub struct MemoryLoader {
	entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryLoader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Encodes and stores the executable under its own name.
	pub fn insert(&self, executable: &Executable) -> Result<()> {
		let bytes = executable.encode()?;
		self.entries.write().insert(executable.name.clone(), bytes);
		Ok(())
	}

	/// Stores already encoded bytes under `name`.
	pub fn insert_raw(&self, name: impl Into<String>, bytes: Vec<u8>) {
		self.entries.write().insert(name.into(), bytes);
	}

	pub fn remove(&self, name: &str) -> bool {
		self.entries.write().remove(name).is_some()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.read().contains_key(name)
	}
}

impl ExecutableLoader for MemoryLoader {
	fn load(&self, name: &str) -> std::result::Result<Executable, LoadError> {
		let entries = self.entries.read();
		let Some(bytes) = entries.get(name) else {
			return Err(LoadError::NotFound(name.to_string()));
		};
		postcard::from_bytes(bytes).map_err(|err| LoadError::Corrupt {
			name: name.to_string(),
			reason: err.to_string(),
		})
	}
}
