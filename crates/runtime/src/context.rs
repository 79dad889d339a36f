// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Execution context identity and cancellation.
//!
//! Ownership of locks is checked against a [`ContextId`] handed around
//! explicitly, never against the identity of the calling OS thread.

use std::{
	fmt::{Display, Formatter},
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicU64, Ordering},
	},
};

/// Opaque identity of an execution context (a process thread, a controller, a test).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(u64);

/// Counter for generating unique context IDs.
static CONTEXT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

impl ContextId {
	/// Allocate a fresh context identity.
	pub fn next() -> Self {
		Self(CONTEXT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
	}

	pub fn value(&self) -> u64 {
		self.0
	}
}

impl Display for ContextId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ctx-{}", self.0)
	}
}

/// A cancellation token for signaling that a process was killed.
///
/// This is a simple atomic boolean that can be shared across threads.
#[derive(Clone, Debug)]
pub struct CancellationToken {
	cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
	/// Create a new cancellation token.
	pub fn new() -> Self {
		Self {
			cancelled: Arc::new(AtomicBool::new(false)),
		}
	}

	/// Signal cancellation. Returns `true` if this call cancelled the token.
	pub fn cancel(&self) -> bool {
		self.cancelled.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok()
	}

	/// Check if cancellation was requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::SeqCst)
	}
}

impl Default for CancellationToken {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_context_ids_are_unique() {
		let a = ContextId::next();
		let b = ContextId::next();
		assert_ne!(a, b);
		assert!(b > a);
	}

	#[test]
	fn test_cancel_once() {
		let token = CancellationToken::new();
		let clone = token.clone();
		assert!(!clone.is_cancelled());
		assert!(token.cancel());
		assert!(!token.cancel());
		assert!(clone.is_cancelled());
	}
}
