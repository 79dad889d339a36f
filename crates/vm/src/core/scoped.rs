// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, sync::Arc};

use automa_type::{Result, Value, error::diagnostic::memory::scope_stack_exhausted, return_error};

use crate::{executable::Executable, instruction::Instruction};

/// One entry of the scope stack.
///
/// The stack records every binding in the order it was made, interleaved
/// with scope markers and the frames of active subroutine calls. A call
/// frame is pushed as `Subr`, `ReturnIp`, `Caller` (top).
#[derive(Debug, Clone)]
pub enum StackEntry {
	/// Sentinel pushed when the VM starts; popping it ends the run.
	Bottom,
	/// Opened by `PushScope`.
	Marker,
	/// A binding made under this name.
	Local(String),
	/// The `SubrCall` instruction that opened a call frame.
	Subr(Instruction),
	/// Where the caller resumes.
	ReturnIp(usize),
	/// The executable to restore on return.
	Caller(Arc<Executable>),
}

/// Name to value-stack storage with lexical shadowing.
///
/// Each name owns a stack of values; the innermost is visible. The number
/// of values stacked under a name always equals the number of `Local`
/// entries for that name on the scope stack.
#[derive(Debug, Default)]
pub struct ScopedStorage {
	bindings: HashMap<String, Vec<Value>>,
	stack: Vec<StackEntry>,
}

impl ScopedStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds a new value, shadowing any existing binding of the name.
	pub fn store(&mut self, name: impl Into<String>, value: Value) {
		let name = name.into();
		self.bindings.entry(name.clone()).or_default().push(value);
		self.stack.push(StackEntry::Local(name));
	}

	pub fn fetch(&self, name: &str) -> Option<&Value> {
		self.bindings.get(name).and_then(|values| values.last())
	}

	pub fn fetch_mut(&mut self, name: &str) -> Option<&mut Value> {
		self.bindings.get_mut(name).and_then(|values| values.last_mut())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.bindings.contains_key(name)
	}

	/// Overwrites the innermost binding. Returns false when the name is unbound.
	pub fn replace(&mut self, name: &str, value: Value) -> bool {
		match self.fetch_mut(name) {
			Some(slot) => {
				*slot = value;
				true
			}
			None => false,
		}
	}

	/// Drops the innermost binding together with its scope stack entry.
	pub fn remove(&mut self, name: &str) -> Option<Value> {
		let value = self.unbind(name)?;
		if let Some(pos) = self.stack.iter().rposition(|entry| matches!(entry, StackEntry::Local(n) if n == name)) {
			self.stack.remove(pos);
		}
		Some(value)
	}

	pub fn push_marker(&mut self) {
		self.stack.push(StackEntry::Marker);
	}

	/// Pops every binding made since the nearest scope marker, and the marker.
	///
	/// A frame never reaches across a subroutine call frame or the bottom
	/// sentinel; without a reachable marker nothing is popped.
	pub fn discard_frame(&mut self) -> Result<usize> {
		let reachable = self
			.stack
			.iter()
			.rev()
			.find(|entry| !matches!(entry, StackEntry::Local(_)))
			.is_some_and(|entry| matches!(entry, StackEntry::Marker));
		if !reachable {
			return_error!(scope_stack_exhausted("discarding a scope frame"));
		}

		let mut discarded = 0;
		while let Some(entry) = self.stack.pop() {
			match entry {
				StackEntry::Local(name) => {
					self.unbind(&name);
					discarded += 1;
				}
				_ => break,
			}
		}
		Ok(discarded)
	}

	pub fn push_entry(&mut self, entry: StackEntry) {
		self.stack.push(entry);
	}

	/// Pops the top entry, dropping the binding a `Local` stands for.
	pub fn unwind_entry(&mut self) -> Option<StackEntry> {
		let entry = self.stack.pop()?;
		if let StackEntry::Local(name) = &entry {
			self.unbind(name);
		}
		Some(entry)
	}

	pub fn top(&self) -> Option<&StackEntry> {
		self.stack.last()
	}

	/// Number of open scope markers.
	pub fn scope_depth(&self) -> usize {
		self.stack.iter().filter(|entry| matches!(entry, StackEntry::Marker)).count()
	}

	pub fn stack_len(&self) -> usize {
		self.stack.len()
	}

	/// How many values are stacked under the name.
	pub fn binding_count(&self, name: &str) -> usize {
		self.bindings.get(name).map_or(0, Vec::len)
	}

	/// Innermost value of every bound name.
	pub fn visible(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.bindings.iter().filter_map(|(name, values)| values.last().map(|value| (name.as_str(), value)))
	}

	fn unbind(&mut self, name: &str) -> Option<Value> {
		let values = self.bindings.get_mut(name)?;
		let value = values.pop();
		if values.is_empty() {
			self.bindings.remove(name);
		}
		value
	}
}
