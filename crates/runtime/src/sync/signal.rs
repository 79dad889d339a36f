// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// A cumulative counting signal.
///
/// Every [`signal`](Self::signal) is remembered, every successful await consumes one.
#[derive(Debug, Default)]
pub struct Signal {
	count: Mutex<usize>,
	raised: Condvar,
}

impl Signal {
	pub fn new() -> Self {
		Self::default()
	}

	/// Increments the counter and wakes one waiter.
	pub fn signal(&self) {
		let mut count = self.count.lock();
		*count += 1;
		self.raised.notify_one();
	}

	/// Blocks while the counter is zero, then decrements it.
	pub fn await_signal(&self) {
		let mut count = self.count.lock();
		while *count == 0 {
			self.raised.wait(&mut count);
		}
		*count -= 1;
	}

	/// Like [`await_signal`](Self::await_signal) but gives up after `timeout`.
	pub fn await_signal_for(&self, timeout: Duration) -> bool {
		let mut count = self.count.lock();
		while *count == 0 {
			if self.raised.wait_for(&mut count, timeout).timed_out() {
				break;
			}
		}
		if *count == 0 {
			return false;
		}
		*count -= 1;
		true
	}

	/// Consumes a pending signal without blocking.
	pub fn try_acquire(&self) -> bool {
		let mut count = self.count.lock();
		if *count == 0 {
			return false;
		}
		*count -= 1;
		true
	}

	pub fn pending(&self) -> usize {
		*self.count.lock()
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, thread};

	use super::*;

	#[test]
	fn test_signals_accumulate() {
		let signal = Signal::new();
		signal.signal();
		signal.signal();
		assert_eq!(signal.pending(), 2);

		signal.await_signal();
		assert!(signal.try_acquire());
		assert!(!signal.try_acquire());
	}

	#[test]
	fn test_await_blocks_until_signalled() {
		let signal = Arc::new(Signal::new());
		let handle = {
			let signal = signal.clone();
			thread::spawn(move || signal.await_signal_for(Duration::from_secs(5)))
		};

		thread::sleep(Duration::from_millis(10));
		signal.signal();
		assert!(handle.join().unwrap());
		assert_eq!(signal.pending(), 0);
	}

	#[test]
	fn test_await_timeout() {
		let signal = Signal::new();
		assert!(!signal.await_signal_for(Duration::from_millis(5)));
	}
}
