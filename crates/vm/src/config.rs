// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// Knobs of the interpreter.
#[derive(Debug, Clone)]
pub struct VmConfig {
	/// Advance past an instruction that executes twice in a row at the
	/// same position, reporting it as an error.
	pub runaway_guard: bool,
	/// Maximum nesting of subroutine calls.
	pub max_call_depth: usize,
}

impl Default for VmConfig {
	fn default() -> Self {
		Self {
			runaway_guard: true,
			max_call_depth: 256,
		}
	}
}

impl VmConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_runaway_guard(mut self, enabled: bool) -> Self {
		self.runaway_guard = enabled;
		self
	}

	pub fn with_max_call_depth(mut self, depth: usize) -> Self {
		self.max_call_depth = depth;
		self
	}
}
