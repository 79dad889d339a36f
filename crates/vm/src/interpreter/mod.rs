// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The interpreter contract between a process and a VM.

mod machine;
mod sim;

use std::fmt::{self, Display, Formatter};

use automa_type::Result;
pub(crate) use machine::Machine;
pub use sim::SimVm;

use crate::{context::ProcessBinding, core::Core};

/// Lifecycle state of a VM and of the process running it.
///
/// The order is meaningful: states at or above [`RunState::Idle`] are
/// active, states below it may be reaped from the process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum RunState {
	Killed = 0,
	Done = 1,
	Idle = 2,
	New = 3,
	Paused = 4,
	Running = 5,
}

impl RunState {
	pub fn is_active(&self) -> bool {
		*self >= RunState::Idle
	}

	pub fn as_u8(self) -> u8 {
		self as u8
	}

	pub fn from_u8(value: u8) -> Option<Self> {
		match value {
			0 => Some(RunState::Killed),
			1 => Some(RunState::Done),
			2 => Some(RunState::Idle),
			3 => Some(RunState::New),
			4 => Some(RunState::Paused),
			5 => Some(RunState::Running),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			RunState::Killed => "killed",
			RunState::Done => "done",
			RunState::Idle => "idle",
			RunState::New => "new",
			RunState::Paused => "paused",
			RunState::Running => "running",
		}
	}
}

impl Display for RunState {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
	Continue,
	Done,
}

/// A steppable script interpreter.
///
/// A process attaches a VM, calls [`start`](Self::start) once, then
/// [`execute`](Self::execute) until it reports [`Step::Done`] or an error.
/// Errors returned from either are terminal: the VM is finished.
pub trait Interpreter: Send {
	/// Binds the VM to a process, optionally inheriting memory from a parent core.
	fn attach(&mut self, binding: ProcessBinding, parent: Option<&Core>) -> Result<()>;

	/// Hook run by `start` before the first instruction.
	fn prepare(&mut self) -> Result<()> {
		Ok(())
	}

	/// Resets bookkeeping and executes the first instruction.
	fn start(&mut self) -> Result<Step>;

	fn execute(&mut self) -> Result<Step>;

	fn state(&self) -> RunState;

	fn set_state(&mut self, state: RunState);

	/// Name of the executable the VM was created for.
	fn name(&self) -> &str;

	/// Runs to completion on the calling thread.
	fn run(&mut self) -> Result<()> {
		let mut step = self.start()?;
		while step == Step::Continue {
			step = self.execute()?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_state_order() {
		assert!(RunState::Killed < RunState::Done);
		assert!(RunState::Done < RunState::Idle);
		assert!(RunState::Idle < RunState::New);
		assert!(RunState::New < RunState::Paused);
		assert!(RunState::Paused < RunState::Running);

		assert!(RunState::Idle.is_active());
		assert!(RunState::Running.is_active());
		assert!(!RunState::Done.is_active());
		assert!(!RunState::Killed.is_active());
	}

	#[test]
	fn test_u8_round_trip() {
		for state in
			[RunState::Killed, RunState::Done, RunState::Idle, RunState::New, RunState::Paused, RunState::Running]
		{
			assert_eq!(RunState::from_u8(state.as_u8()), Some(state));
		}
		assert_eq!(RunState::from_u8(9), None);
	}
}
