// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// A binary gate: waiters pass while green and block while red.
#[derive(Debug, Default)]
pub struct Stoplight {
	green: Mutex<bool>,
	changed: Condvar,
}

impl Stoplight {
	/// Creates a stoplight showing red.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn green(&self) {
		self.set(true);
	}

	pub fn red(&self) {
		self.set(false);
	}

	pub fn is_green(&self) -> bool {
		*self.green.lock()
	}

	/// Blocks while red.
	pub fn await_green(&self) {
		let mut green = self.green.lock();
		while !*green {
			self.changed.wait(&mut green);
		}
	}

	/// Blocks while red, at most for `timeout`. Returns whether the light is green.
	pub fn await_green_for(&self, timeout: Duration) -> bool {
		let mut green = self.green.lock();
		if !*green {
			self.changed.wait_for(&mut green, timeout);
		}
		*green
	}

	fn set(&self, value: bool) {
		let mut green = self.green.lock();
		if *green != value {
			*green = value;
			self.changed.notify_all();
		}
	}
}
