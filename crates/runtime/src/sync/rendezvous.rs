// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct Meeting {
	waiting: bool,
	generation: u64,
	closed: bool,
}

/// A strict two-party meeting point.
///
/// The first caller blocks until a second one arrives, then both return.
/// More than two concurrent callers is undefined: callers must serialize
/// themselves into pairs. Once [`close`](Self::close)d, pending and future
/// meetings return `false` immediately.
#[derive(Debug, Default)]
pub struct Rendezvous {
	meeting: Mutex<Meeting>,
	arrived: Condvar,
}

impl Rendezvous {
	pub fn new() -> Self {
		Self::default()
	}

	/// Meets the other party. Returns `false` if the rendezvous was closed
	/// before the meeting took place.
	pub fn meet(&self) -> bool {
		let mut meeting = self.meeting.lock();
		if meeting.closed {
			return false;
		}

		if meeting.waiting {
			meeting.waiting = false;
			meeting.generation = meeting.generation.wrapping_add(1);
			self.arrived.notify_all();
			return true;
		}

		meeting.waiting = true;
		let generation = meeting.generation;
		while meeting.generation == generation && !meeting.closed {
			self.arrived.wait(&mut meeting);
		}

		meeting.generation != generation
	}

	/// Permanently breaks the rendezvous, releasing a blocked party.
	pub fn close(&self) {
		let mut meeting = self.meeting.lock();
		meeting.closed = true;
		meeting.waiting = false;
		self.arrived.notify_all();
	}

	pub fn is_closed(&self) -> bool {
		self.meeting.lock().closed
	}
}
