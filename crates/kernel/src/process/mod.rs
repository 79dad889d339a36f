// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The process automaton.
//!
//! A process owns one thread. The thread parks on the gate's stoplight until
//! a VM is bound, runs that VM one instruction at a time while servicing
//! control requests between instructions, then unbinds it and parks again.

mod thread;

use std::{
	sync::{
		Arc,
		atomic::{AtomicU8, AtomicU64, Ordering},
	},
	thread::JoinHandle,
	time::Duration,
};

use automa_runtime::{CancellationToken, ContextId, SyncGate};
use automa_type::{Result, error::diagnostic::process::attach_failed};
use automa_vm::{Interpreter, ProcessBinding, RunState, SystemContext};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::ProcessConfig;

pub type Pid = u64;

/// Control requests, honoured by the process thread between instructions.
#[derive(Debug, Default)]
struct Requests {
	pause: bool,
	resume: bool,
	stop: bool,
	query: bool,
}

impl Requests {
	/// Drops pending run control. A pending state query survives.
	fn reset(&mut self) {
		self.pause = false;
		self.resume = false;
		self.stop = false;
	}
}

struct Shared {
	pid: Pid,
	gate: SyncGate,
	requests: Mutex<Requests>,
	cancel: CancellationToken,
	state: AtomicU8,
	slot: Mutex<Option<Box<dyn Interpreter>>>,
	system: Arc<SystemContext>,
	/// Context the process thread holds the gate and environment locks under.
	thread_ctx: ContextId,
	/// Context controllers bind VMs under.
	control_ctx: ContextId,
	/// Serializes state queries into pairs for the rendezvous.
	query: Mutex<()>,
	runs: AtomicU64,
	config: ProcessConfig,
}

impl Shared {
	fn state(&self) -> RunState {
		RunState::from_u8(self.state.load(Ordering::Acquire)).unwrap_or(RunState::Killed)
	}

	fn publish(&self, state: RunState) {
		// kill is irrevocable
		let _ = self.state.fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
			if current == RunState::Killed.as_u8() {
				None
			} else {
				Some(state.as_u8())
			}
		});
	}

	fn is_alive(&self) -> bool {
		!self.cancel.is_cancelled()
	}

	fn check_interval(&self) -> Duration {
		self.config.check_interval
	}
}

/// A reusable execution slot running one VM at a time on its own thread.
pub struct Process {
	shared: Arc<Shared>,
	handle: Mutex<Option<JoinHandle<()>>>,
}

impl Process {
	/// Starts the process thread. The process begins [`RunState::Idle`].
	pub fn spawn(pid: Pid, system: Arc<SystemContext>, config: ProcessConfig) -> Result<Self> {
		let shared = Arc::new(Shared {
			pid,
			gate: SyncGate::new(),
			requests: Mutex::new(Requests::default()),
			cancel: CancellationToken::new(),
			state: AtomicU8::new(RunState::Idle.as_u8()),
			slot: Mutex::new(None),
			system,
			thread_ctx: ContextId::next(),
			control_ctx: ContextId::next(),
			query: Mutex::new(()),
			runs: AtomicU64::new(0),
			config,
		});

		let handle = thread::spawn(Arc::clone(&shared))?;
		debug!(pid = pid, "process spawned");

		Ok(Self {
			shared,
			handle: Mutex::new(Some(handle)),
		})
	}

	pub fn pid(&self) -> Pid {
		self.shared.pid
	}

	pub fn is_alive(&self) -> bool {
		self.shared.is_alive()
	}

	/// Number of VM runs this process has finished.
	pub fn runs(&self) -> u64 {
		self.shared.runs.load(Ordering::Acquire)
	}

	/// The binding a VM gets when attached to this process.
	///
	/// Hosts attaching a VM themselves, e.g. to inherit a parent core, use
	/// this before handing the VM to [`execute`](Self::execute).
	pub fn binding(&self) -> ProcessBinding {
		ProcessBinding {
			pid: self.shared.pid,
			context: self.shared.thread_ctx,
			cancel: self.shared.cancel.clone(),
			system: Arc::clone(&self.shared.system),
		}
	}

	/// Binds `vm` and lets the process thread run it.
	///
	/// Returns `false` if the process is dead or already has a VM. A VM not
	/// yet attached is attached here without a parent core.
	pub fn execute(&self, vm: Box<dyn Interpreter>) -> bool {
		let shared = &self.shared;
		if !shared.is_alive() {
			return false;
		}
		// held by the process thread for the whole of a run
		if !shared.gate.try_lock(shared.control_ctx) {
			return false;
		}

		let bound = self.bind(vm);
		shared.gate.unlock(shared.control_ctx);
		bound
	}

	fn bind(&self, mut vm: Box<dyn Interpreter>) -> bool {
		let shared = &self.shared;
		let mut slot = shared.slot.lock();
		if slot.is_some() {
			return false;
		}

		if vm.state() != RunState::New {
			if let Err(err) = vm.attach(self.binding(), None) {
				shared.system.emit(&attach_failed(shared.pid, &err));
				return false;
			}
		}

		let name = vm.name().to_string();
		*slot = Some(vm);
		shared.requests.lock().reset();
		shared.publish(RunState::New);
		// under the slot lock so the thread cannot park on a stale red
		shared.gate.green();
		debug!(pid = shared.pid, executable = %name, "vm bound");
		true
	}

	/// Asks the running VM to pause at the next instruction boundary.
	pub fn pause(&self) -> bool {
		if !self.is_alive() {
			return false;
		}
		self.shared.requests.lock().pause = true;
		true
	}

	pub fn resume(&self) -> bool {
		if !self.is_alive() {
			return false;
		}
		self.shared.requests.lock().resume = true;
		self.shared.gate.green();
		true
	}

	/// Asks the running VM to stop at the next instruction boundary. The
	/// process stays usable.
	pub fn stop(&self) -> bool {
		if !self.is_alive() {
			return false;
		}
		self.shared.requests.lock().stop = true;
		self.shared.gate.green();
		true
	}

	/// Kills the process. Returns `false` if it was already dead.
	pub fn kill(&self) -> bool {
		let shared = &self.shared;
		if !shared.cancel.cancel() {
			return false;
		}

		shared.state.store(RunState::Killed.as_u8(), Ordering::Release);
		shared.gate.green();
		shared.gate.close_rendezvous();
		shared.gate.signal();
		debug!(pid = shared.pid, "process killed");
		true
	}

	/// The state as observed by the process thread itself.
	///
	/// Blocks until the thread reaches its next instruction boundary, or
	/// its next check interval when idle.
	pub fn verify_state(&self) -> RunState {
		let shared = &self.shared;
		if !shared.is_alive() {
			return RunState::Killed;
		}

		let _query = shared.query.lock();
		shared.requests.lock().query = true;
		if !shared.gate.rendezvous() {
			return RunState::Killed;
		}
		shared.state()
	}

	/// Last published state, possibly stale.
	pub fn get_state(&self) -> RunState {
		self.shared.state()
	}

	/// Waits for the next finished run. Returns `false` on timeout.
	pub fn await_completion(&self, timeout: Duration) -> bool {
		self.shared.gate.await_signal_for(timeout)
	}

	/// Kills the process and waits for its thread to exit.
	pub fn join(&self) {
		self.kill();
		let handle = self.handle.lock().take();
		if let Some(handle) = handle {
			if handle.join().is_err() {
				warn!(pid = self.shared.pid, "process thread panicked");
			}
		}
	}
}

impl Drop for Process {
	fn drop(&mut self) {
		self.kill();
	}
}
