// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The process thread.
//!
//! Only this thread ever touches a bound VM. Controllers reach it through the
//! request flags and the gate.

use std::{
	sync::{Arc, atomic::Ordering},
	thread::{self, JoinHandle},
};

use automa_type::{
	Result, error,
	error::diagnostic::process::{process_killed, spawn_failed, vm_terminated},
};
use automa_vm::{Interpreter, RunState, Step};
use tracing::{debug, trace};

use super::Shared;

/// What the thread does after servicing requests at an instruction boundary.
enum Control {
	Proceed,
	Stop,
	Kill,
}

pub(super) fn spawn(shared: Arc<Shared>) -> Result<JoinHandle<()>> {
	let pid = shared.pid;
	let name = format!("{}-{}", shared.config.thread_name_prefix, pid);

	thread::Builder::new()
		.name(name)
		.spawn(move || {
			debug!(pid = pid, "process thread starting");
			run_process_loop(&shared);
			debug!(pid = pid, "process thread stopped");
		})
		.map_err(|err| error!(spawn_failed(pid, err.to_string())))
}

fn run_process_loop(shared: &Shared) {
	while shared.is_alive() {
		if !park(shared) {
			continue;
		}
		if !has_bound_vm(shared) {
			continue;
		}
		if !shared.gate.lock_until(shared.thread_ctx, &shared.cancel, shared.check_interval()) {
			continue;
		}

		let vm = shared.slot.lock().take();
		if let Some(mut vm) = vm {
			run_vm(shared, vm.as_mut());
		}
		finish_run(shared);
	}
}

/// Waits for a green light, answering state queries meanwhile. Returns
/// `false` once the process is killed.
fn park(shared: &Shared) -> bool {
	loop {
		serve_query(shared);
		if !shared.is_alive() {
			return false;
		}
		if shared.gate.await_green_for(shared.check_interval()) {
			return shared.is_alive();
		}
	}
}

/// A green light without a bound VM comes from a stray resume or stop.
fn has_bound_vm(shared: &Shared) -> bool {
	let slot = shared.slot.lock();
	if slot.is_some() {
		return true;
	}
	shared.gate.red();
	shared.requests.lock().reset();
	false
}

fn serve_query(shared: &Shared) {
	let pending = std::mem::take(&mut shared.requests.lock().query);
	if pending {
		trace!(pid = shared.pid, state = %shared.state(), "answering state query");
		shared.gate.rendezvous();
	}
}

fn run_vm(shared: &Shared, vm: &mut dyn Interpreter) {
	let pid = shared.pid;
	if !shared.is_alive() {
		vm.set_state(RunState::Killed);
		return;
	}

	debug!(pid = pid, executable = %vm.name(), "vm starting");
	let mut step = vm.start();
	loop {
		match step {
			Ok(Step::Continue) => {}
			Ok(Step::Done) => {
				debug!(pid = pid, executable = %vm.name(), "vm finished");
				return;
			}
			// a kill interrupting a blocking call surfaces as that call's failure
			Err(_) if !shared.is_alive() => {
				killed(shared, vm);
				return;
			}
			Err(err) => {
				shared.system.emit(&vm_terminated(pid, &err));
				return;
			}
		}

		shared.publish(vm.state());
		match service_requests(shared, vm) {
			Control::Proceed => {}
			Control::Stop => {
				vm.set_state(RunState::Done);
				debug!(pid = pid, executable = %vm.name(), "vm stopped");
				return;
			}
			Control::Kill => {
				killed(shared, vm);
				return;
			}
		}

		step = vm.execute();
	}
}

fn killed(shared: &Shared, vm: &mut dyn Interpreter) {
	vm.set_state(RunState::Killed);
	shared.system.emit(&process_killed(shared.pid));
}

/// Applies pending requests. Blocks while the VM is paused.
fn service_requests(shared: &Shared, vm: &mut dyn Interpreter) -> Control {
	loop {
		if !shared.is_alive() {
			return Control::Kill;
		}

		let query = {
			let mut requests = shared.requests.lock();
			if requests.stop {
				requests.stop = false;
				return Control::Stop;
			}
			if requests.resume {
				requests.resume = false;
				requests.pause = false;
				if vm.state() == RunState::Paused {
					vm.set_state(RunState::Running);
					shared.publish(RunState::Running);
					debug!(pid = shared.pid, "vm resumed");
				}
			}
			if requests.pause {
				requests.pause = false;
				vm.set_state(RunState::Paused);
				shared.publish(RunState::Paused);
				// red under the requests lock, a concurrent resume greens after it
				shared.gate.red();
				debug!(pid = shared.pid, "vm paused");
			}
			std::mem::take(&mut requests.query)
		};

		if query {
			shared.gate.rendezvous();
		}
		if vm.state() != RunState::Paused {
			return Control::Proceed;
		}
		shared.gate.await_green_for(shared.check_interval());
	}
}

fn finish_run(shared: &Shared) {
	shared.publish(RunState::Done);
	shared.requests.lock().reset();
	shared.gate.red();
	shared.gate.unlock(shared.thread_ctx);
	shared.runs.fetch_add(1, Ordering::AcqRel);
	shared.gate.signal();
}
