// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use automa_type::{
	Result, Value, error,
	error::diagnostic::runtime::{jump_out_of_range, not_attached, not_running},
	internal_error, return_error,
};
use tracing::debug;

use super::{Interpreter, Machine, RunState, Step};
use crate::{
	context::ProcessBinding,
	core::{Core, Environment},
	executable::Executable,
};

/// The script interpreter.
///
/// One instruction per [`execute`](Interpreter::execute) call. All memory
/// lives in the [`Core`] built on attach; the VM itself only carries the
/// registers and the call bookkeeping.
pub struct SimVm {
	entry: Arc<Executable>,
	state: RunState,
	machine: Option<Machine>,
}

impl SimVm {
	pub fn new(executable: Arc<Executable>) -> Self {
		Self {
			entry: executable,
			state: RunState::Idle,
			machine: None,
		}
	}

	pub fn is_attached(&self) -> bool {
		self.machine.is_some()
	}

	pub fn pid(&self) -> Option<u64> {
		self.machine.as_ref().map(|machine| machine.pid)
	}

	pub fn ip(&self) -> usize {
		self.machine.as_ref().map_or(0, |machine| machine.ip)
	}

	pub fn left(&self) -> &Value {
		self.machine.as_ref().map_or(&Value::Undefined, |machine| &machine.left)
	}

	pub fn right(&self) -> &Value {
		self.machine.as_ref().map_or(&Value::Undefined, |machine| &machine.right)
	}

	pub fn core(&self) -> Option<&Core> {
		self.machine.as_ref().map(|machine| &machine.core)
	}

	pub fn core_mut(&mut self) -> Option<&mut Core> {
		self.machine.as_mut().map(|machine| &mut machine.core)
	}

	/// Name of the executable currently running, which differs from
	/// [`name`](Interpreter::name) inside a subroutine.
	pub fn current_executable(&self) -> &str {
		self.machine.as_ref().map_or(&self.entry.name, |machine| &machine.executable.name)
	}

	pub fn call_depth(&self) -> usize {
		self.machine.as_ref().map_or(0, |machine| machine.depth)
	}

	pub fn error_count(&self) -> usize {
		self.machine.as_ref().map_or(0, |machine| machine.errors)
	}

	pub fn fault_count(&self) -> usize {
		self.machine.as_ref().map_or(0, |machine| machine.faults)
	}
}

impl Interpreter for SimVm {
	fn attach(&mut self, binding: ProcessBinding, parent: Option<&Core>) -> Result<()> {
		if matches!(self.state, RunState::Running | RunState::Paused) {
			return_error!(internal_error!("cannot attach vm '{}' while it is {}", self.entry.name, self.state));
		}

		let env = parent.map(Core::environment).unwrap_or_else(|| Arc::new(Environment::new()));
		let mut core = Core::new(binding.context, binding.cancel, env);
		for (name, value) in binding.system.seed() {
			core.store(name.clone(), value.clone());
		}
		if let Some(parent) = parent {
			core.inherit(parent);
		}

		debug!(pid = binding.pid, executable = %self.entry.name, inherited = parent.is_some(), "vm attached");
		self.machine = Some(Machine::new(binding.system, binding.pid, core, Arc::clone(&self.entry)));
		self.state = RunState::New;
		Ok(())
	}

	/// Rejects branch targets outside the executable.
	fn prepare(&mut self) -> Result<()> {
		let len = self.entry.len();
		let invalid = self.entry.instructions.iter().filter_map(|instruction| instruction.target()).find(|target| *target > len);
		if let Some(target) = invalid {
			return_error!(jump_out_of_range(target, len));
		}
		Ok(())
	}

	fn start(&mut self) -> Result<Step> {
		if self.state != RunState::New {
			return_error!(not_running(self.state.as_str()));
		}
		if self.machine.is_none() {
			return_error!(not_attached());
		}

		if let Err(err) = self.prepare() {
			if let Some(machine) = &self.machine {
				machine.system.emit(&err);
			}
			self.state = RunState::Done;
			return Err(err);
		}

		let entry = Arc::clone(&self.entry);
		if let Some(machine) = self.machine.as_mut() {
			machine.reset(entry);
		}
		self.state = RunState::Running;
		self.execute()
	}

	fn execute(&mut self) -> Result<Step> {
		if self.state != RunState::Running {
			return_error!(not_running(self.state.as_str()));
		}
		let machine = self.machine.as_mut().ok_or_else(|| error!(not_attached()))?;

		let step = machine.step();
		if !matches!(step, Ok(Step::Continue)) {
			self.state = RunState::Done;
		}
		step
	}

	fn state(&self) -> RunState {
		self.state
	}

	fn set_state(&mut self, state: RunState) {
		self.state = state;
	}

	fn name(&self) -> &str {
		&self.entry.name
	}
}

#[cfg(test)]
mod tests {
	use automa_type::{Diagnostic, Severity};
	use crossbeam_channel::Receiver;

	use super::*;
	use crate::{
		context::SystemContext,
		executable::{ExecutableBuilder, MemoryLoader},
		instruction::{AssertMode, IfMode, MathOp},
		log::ChannelSink,
	};

	fn system_with(executables: &[Executable]) -> (Arc<SystemContext>, Receiver<Diagnostic>) {
		let loader = MemoryLoader::new();
		for executable in executables {
			loader.insert(executable).unwrap();
		}
		let (sink, receiver) = ChannelSink::new();
		let system = SystemContext::builder(Arc::new(loader)).sink(Arc::new(sink)).build();
		(system, receiver)
	}

	fn attached(executable: Executable, system: &Arc<SystemContext>) -> SimVm {
		let mut vm = SimVm::new(Arc::new(executable));
		vm.attach(ProcessBinding::detached(Arc::clone(system)), None).unwrap();
		vm
	}

	#[test]
	fn test_lifecycle_states() {
		let (system, _) = system_with(&[]);
		let mut vm = SimVm::new(Arc::new(ExecutableBuilder::new("main").nop().build()));
		assert_eq!(vm.state(), RunState::Idle);

		vm.attach(ProcessBinding::detached(system), None).unwrap();
		assert_eq!(vm.state(), RunState::New);

		assert_eq!(vm.start().unwrap(), Step::Continue);
		assert_eq!(vm.state(), RunState::Running);

		assert_eq!(vm.execute().unwrap(), Step::Done);
		assert_eq!(vm.state(), RunState::Done);

		let err = vm.execute().unwrap_err();
		assert_eq!(err.code(), "VM_015");
	}

	#[test]
	fn test_start_requires_attach() {
		let mut vm = SimVm::new(Arc::new(ExecutableBuilder::new("main").build()));
		vm.set_state(RunState::New);
		assert_eq!(vm.start().unwrap_err().code(), "VM_017");
	}

	#[test]
	fn test_empty_program_finishes_on_start() {
		let (system, _) = system_with(&[]);
		let mut vm = attached(ExecutableBuilder::new("empty").build(), &system);
		assert_eq!(vm.start().unwrap(), Step::Done);
	}

	#[test]
	fn test_prepare_rejects_bad_target() {
		let (system, logs) = system_with(&[]);
		let mut vm = attached(ExecutableBuilder::new("bad").jump(9).build(), &system);

		let err = vm.start().unwrap_err();
		assert_eq!(err.code(), "VM_006");
		assert_eq!(vm.state(), RunState::Done);
		assert_eq!(logs.try_recv().unwrap().code, "VM_006");
	}

	#[test]
	fn test_seed_variables() {
		let loader = Arc::new(MemoryLoader::new());
		let system = SystemContext::builder(loader).seed("host", "alpha").build();
		let mut vm = attached(ExecutableBuilder::new("seeded").fetch("host").build(), &system);
		vm.run().unwrap();
		assert_eq!(vm.left(), &Value::text("alpha"));
	}

	#[test]
	fn test_store_replaces_in_place() {
		let (system, _) = system_with(&[]);
		let mut vm = attached(
			ExecutableBuilder::new("main").load("1").store("x").load("2").store("x").build(),
			&system,
		);
		vm.run().unwrap();

		let core = vm.core().unwrap();
		assert_eq!(core.fetch("x"), Some(&Value::text("2")));
		assert_eq!(core.binding_count("x"), 1);
	}

	#[test]
	fn test_if_branches() {
		let (system, _) = system_with(&[]);
		// left = 0: EqualZero holds, fall through to "yes"
		let executable = ExecutableBuilder::new("main")
			.load("0")
			.if_(IfMode::EqualZero, 4)
			.load("yes")
			.jump(5)
			.load("no")
			.build();
		let mut vm = attached(executable.clone(), &system);
		vm.run().unwrap();
		assert_eq!(vm.left(), &Value::text("yes"));

		let mut instructions = executable.instructions.clone();
		instructions[0] = crate::instruction::Instruction::Load("abc".to_string());
		let unparsable = Executable {
			instructions,
			..executable
		};
		let mut vm = attached(unparsable, &system);
		vm.run().unwrap();
		assert_eq!(vm.left(), &Value::text("no"));
	}

	#[test]
	fn test_fetch_before_assert_tolerates_missing() {
		let (system, logs) = system_with(&[]);
		let executable = ExecutableBuilder::new("main")
			.load("stale")
			.fetch("missing")
			.assert(AssertMode::NotEmpty, 5)
			.load("found")
			.jump(6)
			.load("absent")
			.build();
		let mut vm = attached(executable, &system);
		vm.run().unwrap();

		assert_eq!(vm.left(), &Value::text("absent"));
		assert_eq!(vm.error_count(), 0);
		assert!(logs.try_recv().is_err());
	}

	#[test]
	fn test_fetch_missing_is_error() {
		let (system, logs) = system_with(&[]);
		let mut vm = attached(ExecutableBuilder::new("main").fetch("missing").load("after").build(), &system);
		vm.run().unwrap();

		assert_eq!(vm.left(), &Value::text("after"));
		assert_eq!(vm.error_count(), 1);
		let logged = logs.try_recv().unwrap();
		assert_eq!(logged.code, "MEMORY_001");
		assert_eq!(logged.severity, Severity::Error);
	}

	#[test]
	fn test_runaway_guard() {
		let (system, logs) = system_with(&[]);
		let mut vm = attached(ExecutableBuilder::new("main").jump(0).load("escaped").build(), &system);
		vm.run().unwrap();

		assert_eq!(vm.left(), &Value::text("escaped"));
		assert_eq!(logs.try_recv().unwrap().code, "VM_011");
	}

	#[test]
	fn test_top_level_fault_terminates() {
		let (system, logs) = system_with(&[]);
		let mut vm = attached(ExecutableBuilder::new("main").load("a").fault().load("b").build(), &system);

		let err = vm.run().unwrap_err();
		assert_eq!(err.code(), "VM_010");
		assert_eq!(vm.state(), RunState::Done);
		assert_eq!(vm.left(), &Value::text("a"));
		assert_eq!(logs.try_recv().unwrap().code, "VM_010");
	}

	#[test]
	fn test_math_in_program() {
		let (system, _) = system_with(&[]);
		let mut vm = attached(
			ExecutableBuilder::new("main").load("6").right_from_left().load("7").math(MathOp::Multiply).build(),
			&system,
		);
		vm.run().unwrap();
		assert_eq!(vm.left(), &Value::text("42"));
		assert_eq!(vm.right(), &Value::text("6"));
	}

	#[test]
	fn test_child_inherits_parent_core() {
		let (system, _) = system_with(&[]);
		let mut parent = Core::standalone();
		parent.store("greeting", Value::text("hello"));

		let mut child = SimVm::new(Arc::new(ExecutableBuilder::new("child").fetch("greeting").build()));
		child.attach(ProcessBinding::detached(system), Some(&parent)).unwrap();
		child.run().unwrap();
		assert_eq!(child.left(), &Value::text("hello"));
	}
}
