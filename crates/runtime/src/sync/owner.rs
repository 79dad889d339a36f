// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::context::{CancellationToken, ContextId};

#[derive(Debug, Default)]
struct Holder {
	owner: Option<ContextId>,
	count: usize,
}

/// An owner-aware, reentrant mutex.
///
/// The lock is held by a [`ContextId`] rather than by a thread. The holder may
/// acquire it again, every acquisition must be matched by an [`unlock`](Self::unlock).
/// Releasing the last hold wakes all waiters.
#[derive(Debug, Default)]
pub struct OwnerMutex {
	holder: Mutex<Holder>,
	released: Condvar,
}

impl OwnerMutex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Acquires the lock if it is free or already held by `ctx`.
	pub fn try_lock(&self, ctx: ContextId) -> bool {
		let mut holder = self.holder.lock();
		Self::acquire(&mut holder, ctx)
	}

	/// Blocks until the lock is acquired by `ctx`.
	pub fn lock(&self, ctx: ContextId) {
		let mut holder = self.holder.lock();
		while !Self::acquire(&mut holder, ctx) {
			self.released.wait(&mut holder);
		}
	}

	/// Blocks until the lock is acquired or the timeout expires.
	pub fn lock_for(&self, ctx: ContextId, timeout: Duration) -> bool {
		let mut holder = self.holder.lock();
		while !Self::acquire(&mut holder, ctx) {
			if self.released.wait_for(&mut holder, timeout).timed_out() {
				return Self::acquire(&mut holder, ctx);
			}
		}
		true
	}

	/// Blocks until the lock is acquired, re-checking `cancel` every `interval`.
	///
	/// Returns `false` without acquiring if the token was cancelled.
	pub fn lock_until(&self, ctx: ContextId, cancel: &CancellationToken, interval: Duration) -> bool {
		let mut holder = self.holder.lock();
		loop {
			if cancel.is_cancelled() {
				trace!(ctx = %ctx, owner = ?holder.owner, "lock wait cancelled");
				return false;
			}
			if Self::acquire(&mut holder, ctx) {
				return true;
			}
			self.released.wait_for(&mut holder, interval);
		}
	}

	/// Releases one hold. Returns `false` if `ctx` does not hold the lock.
	pub fn unlock(&self, ctx: ContextId) -> bool {
		let mut holder = self.holder.lock();
		if holder.owner != Some(ctx) {
			return false;
		}

		holder.count -= 1;
		if holder.count == 0 {
			holder.owner = None;
			self.released.notify_all();
		}
		true
	}

	/// Current owner, if any.
	pub fn owner(&self) -> Option<ContextId> {
		self.holder.lock().owner
	}

	/// Number of outstanding holds of the current owner.
	pub fn hold_count(&self) -> usize {
		self.holder.lock().count
	}

	pub fn is_locked(&self) -> bool {
		self.holder.lock().owner.is_some()
	}

	fn acquire(holder: &mut Holder, ctx: ContextId) -> bool {
		match holder.owner {
			None => {
				holder.owner = Some(ctx);
				holder.count = 1;
				true
			}
			Some(owner) if owner == ctx => {
				holder.count += 1;
				true
			}
			Some(_) => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::{
		sync::{
			Arc,
			atomic::{AtomicBool, Ordering},
		},
		thread,
	};

	use super::*;

	#[test]
	fn test_reentrant_for_owner() {
		let mutex = OwnerMutex::new();
		let ctx = ContextId::next();

		assert!(mutex.try_lock(ctx));
		assert!(mutex.try_lock(ctx));
		assert_eq!(mutex.hold_count(), 2);

		assert!(mutex.unlock(ctx));
		assert_eq!(mutex.owner(), Some(ctx));
		assert!(mutex.unlock(ctx));
		assert_eq!(mutex.owner(), None);
	}

	#[test]
	fn test_other_context_rejected() {
		let mutex = OwnerMutex::new();
		let owner = ContextId::next();
		let other = ContextId::next();

		assert!(mutex.try_lock(owner));
		assert!(!mutex.try_lock(other));
		assert!(!mutex.unlock(other));
		assert!(mutex.unlock(owner));
		assert!(mutex.try_lock(other));
	}

	#[test]
	fn test_blocking_lock_waits_for_release() {
		let mutex = Arc::new(OwnerMutex::new());
		let owner = ContextId::next();
		let waiter = ContextId::next();
		assert!(mutex.try_lock(owner));

		let acquired = Arc::new(AtomicBool::new(false));
		let handle = {
			let mutex = mutex.clone();
			let acquired = acquired.clone();
			thread::spawn(move || {
				mutex.lock(waiter);
				acquired.store(true, Ordering::SeqCst);
			})
		};

		thread::sleep(Duration::from_millis(20));
		assert!(!acquired.load(Ordering::SeqCst));

		assert!(mutex.unlock(owner));
		handle.join().unwrap();
		assert!(acquired.load(Ordering::SeqCst));
		assert_eq!(mutex.owner(), Some(waiter));
	}

	#[test]
	fn test_lock_for_times_out() {
		let mutex = OwnerMutex::new();
		let owner = ContextId::next();
		assert!(mutex.try_lock(owner));
		assert!(!mutex.lock_for(ContextId::next(), Duration::from_millis(5)));
	}

	#[test]
	fn test_lock_until_cancelled() {
		let mutex = Arc::new(OwnerMutex::new());
		assert!(mutex.try_lock(ContextId::next()));

		let cancel = CancellationToken::new();
		let handle = {
			let mutex = mutex.clone();
			let cancel = cancel.clone();
			thread::spawn(move || mutex.lock_until(ContextId::next(), &cancel, Duration::from_millis(1)))
		};

		thread::sleep(Duration::from_millis(10));
		cancel.cancel();
		assert!(!handle.join().unwrap());
	}
}
