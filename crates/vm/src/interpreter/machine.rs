// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{mem, sync::Arc};

use automa_type::{
	Error, Result, Severity, Value, error,
	error::diagnostic::{
		memory::scope_stack_exhausted,
		runtime::{missing_output, runaway},
	},
	return_error, return_internal_error,
};
use tracing::{debug, trace};

use super::Step;
use crate::{
	context::SystemContext,
	core::{Core, StackEntry},
	executable::Executable,
	handler,
};

/// Execution state of an attached VM.
pub(crate) struct Machine {
	pub(crate) system: Arc<SystemContext>,
	pub(crate) pid: u64,
	pub(crate) core: Core,
	pub(crate) executable: Arc<Executable>,
	pub(crate) ip: usize,
	pub(crate) left: Value,
	pub(crate) right: Value,
	/// Number of active subroutine frames.
	pub(crate) depth: usize,
	pub(crate) errors: usize,
	pub(crate) faults: usize,
	/// `(depth, ip)` of the previously executed instruction.
	last: Option<(usize, usize)>,
}

impl Machine {
	pub(crate) fn new(system: Arc<SystemContext>, pid: u64, core: Core, executable: Arc<Executable>) -> Self {
		Self {
			system,
			pid,
			core,
			executable,
			ip: 0,
			left: Value::Undefined,
			right: Value::Undefined,
			depth: 0,
			errors: 0,
			faults: 0,
			last: None,
		}
	}

	/// Puts the machine at the first instruction of `entry` on a fresh call stack.
	pub(crate) fn reset(&mut self, entry: Arc<Executable>) {
		self.executable = entry;
		self.ip = 0;
		self.left = Value::Undefined;
		self.right = Value::Undefined;
		self.depth = 0;
		self.errors = 0;
		self.faults = 0;
		self.last = None;
		self.core.push_entry(StackEntry::Bottom);
	}

	pub(crate) fn step(&mut self) -> Result<Step> {
		let position = (self.depth, self.ip);

		if self.ip >= self.executable.len() {
			return match self.unwind_return() {
				Ok(step) => Ok(step),
				Err(err) => self.route(err, position),
			};
		}

		if self.system.config().runaway_guard && self.last == Some(position) {
			self.last = None;
			self.ip += 1;
			return self.route(error!(runaway(&self.executable.name, position.1)), position);
		}
		self.last = Some(position);

		let executable = Arc::clone(&self.executable);
		let instruction = &executable.instructions[self.ip];
		trace!(pid = self.pid, ip = self.ip, depth = self.depth, %instruction, "execute");

		match handler::dispatch(self, instruction) {
			Ok(()) => Ok(Step::Continue),
			Err(err) => self.route(err, position),
		}
	}

	/// Applies the escalation policy to a condition raised at `position`.
	///
	/// The condition reaches the sink before its consequence is applied.
	fn route(&mut self, err: Error, position: (usize, usize)) -> Result<Step> {
		self.system.emit(&err);

		match err.severity() {
			Severity::Informational | Severity::Warning => Ok(Step::Continue),
			Severity::Error => {
				self.errors += 1;
				if (self.depth, self.ip) == position {
					self.ip += 1;
				}
				Ok(Step::Continue)
			}
			// a killed process never recovers a subroutine
			Severity::Fault if self.depth > 0 && !self.core.is_cancelled() => {
				self.faults += 1;
				match self.unwind_fault() {
					Ok(()) => Ok(Step::Continue),
					Err(panic) => {
						self.system.emit(&panic);
						Err(panic)
					}
				}
			}
			Severity::Fault | Severity::Panic => {
				self.faults += 1;
				Err(err)
			}
		}
	}

	/// Handles running past the end of the current executable.
	///
	/// Inside a subroutine this is the return. At top level the program is
	/// finished and its bindings stay readable until the VM is dropped.
	fn unwind_return(&mut self) -> Result<Step> {
		if self.depth == 0 {
			debug!(pid = self.pid, executable = %self.executable.name, "program finished");
			return Ok(Step::Done);
		}

		loop {
			match self.core.unwind_entry() {
				Some(StackEntry::Local(_)) | Some(StackEntry::Marker) => continue,
				Some(StackEntry::Caller(caller)) => {
					self.return_to(caller, false)?;
					return Ok(Step::Continue);
				}
				Some(entry) => {
					return_internal_error!("unexpected {:?} on top of a call frame", entry);
				}
				None => {
					return_error!(scope_stack_exhausted("returning from a subroutine"));
				}
			}
		}
	}

	/// Abandons the current subroutine and resumes its caller.
	fn unwind_fault(&mut self) -> Result<()> {
		loop {
			match self.core.unwind_entry() {
				Some(StackEntry::Local(_)) | Some(StackEntry::Marker) => continue,
				Some(StackEntry::Caller(caller)) => return self.return_to(caller, true),
				Some(entry) => {
					return_internal_error!("unexpected {:?} while unwinding a fault", entry);
				}
				None => {
					return_error!(scope_stack_exhausted("unwinding a faulted subroutine"));
				}
			}
		}
	}

	/// Pops the rest of the call frame below `Caller` and switches back.
	fn return_to(&mut self, caller: Arc<Executable>, faulted: bool) -> Result<()> {
		let Some(StackEntry::ReturnIp(ip)) = self.core.unwind_entry() else {
			return_internal_error!("call frame of '{}' has no return address", self.executable.name);
		};
		let Some(StackEntry::Subr(_)) = self.core.unwind_entry() else {
			return_internal_error!("call frame of '{}' has no subroutine boundary", self.executable.name);
		};

		let callee = mem::replace(&mut self.executable, caller);
		self.ip = ip;
		self.depth = self.depth.saturating_sub(1);
		self.last = None;

		let output = callee.output_var.as_deref().map(|var| (var, self.core.remove(var)));
		self.left = match output {
			_ if faulted => Value::Undefined,
			Some((_, Some(value))) if !value.is_undefined() => handler::register_value(value),
			Some((var, _)) => {
				self.system.emit(&missing_output(&callee.name, var));
				Value::Undefined
			}
			None => Value::Undefined,
		};

		debug!(
			pid = self.pid,
			callee = %callee.name,
			caller = %self.executable.name,
			ip,
			faulted,
			"returned from subroutine"
		);
		Ok(())
	}
}
