// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use super::{OwnerMutex, Rendezvous, Signal, Stoplight};
use crate::context::{CancellationToken, ContextId};

/// The composite primitive a process coordinates with its controllers through.
///
/// The four parts are independent of each other; the gate only bundles them
/// so a process can hand out a single shared handle.
#[derive(Debug, Default)]
pub struct SyncGate {
	mutex: OwnerMutex,
	signal: Signal,
	rendezvous: Rendezvous,
	light: Stoplight,
}

impl SyncGate {
	/// Creates a gate with an unheld mutex, no pending signals and a red light.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn try_lock(&self, ctx: ContextId) -> bool {
		self.mutex.try_lock(ctx)
	}

	pub fn blocking_lock(&self, ctx: ContextId) {
		self.mutex.lock(ctx)
	}

	pub fn lock_until(&self, ctx: ContextId, cancel: &CancellationToken, interval: Duration) -> bool {
		self.mutex.lock_until(ctx, cancel, interval)
	}

	pub fn unlock(&self, ctx: ContextId) -> bool {
		self.mutex.unlock(ctx)
	}

	pub fn lock_owner(&self) -> Option<ContextId> {
		self.mutex.owner()
	}

	pub fn signal(&self) {
		self.signal.signal()
	}

	pub fn await_signal(&self) {
		self.signal.await_signal()
	}

	pub fn await_signal_for(&self, timeout: Duration) -> bool {
		self.signal.await_signal_for(timeout)
	}

	pub fn pending_signals(&self) -> usize {
		self.signal.pending()
	}

	pub fn rendezvous(&self) -> bool {
		self.rendezvous.meet()
	}

	pub fn close_rendezvous(&self) {
		self.rendezvous.close()
	}

	pub fn green(&self) {
		self.light.green()
	}

	pub fn red(&self) {
		self.light.red()
	}

	pub fn is_green(&self) -> bool {
		self.light.is_green()
	}

	pub fn await_green(&self) {
		self.light.await_green()
	}

	pub fn await_green_for(&self, timeout: Duration) -> bool {
		self.light.await_green_for(timeout)
	}
}
