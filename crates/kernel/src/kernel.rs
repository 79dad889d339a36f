// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicU64, Ordering},
};

use automa_type::Result;
use automa_vm::SystemContext;
use dashmap::DashMap;
use tracing::debug;

use crate::{
	config::KernelConfig,
	process::{Pid, Process},
};

/// The process table.
///
/// Hands out processes under unique, strictly increasing pids. Finished
/// processes stay resolvable until the table grows past the scrub threshold.
pub struct Kernel {
	next_pid: AtomicU64,
	table: DashMap<Pid, Arc<Process>>,
	system: Arc<SystemContext>,
	config: KernelConfig,
}

impl Kernel {
	pub fn new(system: Arc<SystemContext>) -> Self {
		Self::with_config(system, KernelConfig::default())
	}

	pub fn with_config(system: Arc<SystemContext>, config: KernelConfig) -> Self {
		Self {
			next_pid: AtomicU64::new(1),
			table: DashMap::new(),
			system,
			config,
		}
	}

	pub fn system(&self) -> &Arc<SystemContext> {
		&self.system
	}

	/// Spawns and registers a new process.
	pub fn get(&self) -> Result<Arc<Process>> {
		if self.table.len() > self.config.scrub_threshold {
			self.scrub_table();
		}

		let pid = self.next_pid.fetch_add(1, Ordering::AcqRel);
		let process = Arc::new(Process::spawn(pid, Arc::clone(&self.system), self.config.process.clone())?);
		self.table.insert(pid, Arc::clone(&process));
		Ok(process)
	}

	pub fn get_process(&self, pid: Pid) -> Option<Arc<Process>> {
		self.table.get(&pid).map(|entry| Arc::clone(entry.value()))
	}

	/// Active processes, ordered by pid.
	pub fn get_process_list(&self) -> Vec<Arc<Process>> {
		let mut processes: Vec<_> = self
			.table
			.iter()
			.filter(|entry| entry.value().get_state().is_active())
			.map(|entry| Arc::clone(entry.value()))
			.collect();
		processes.sort_by_key(|process| process.pid());
		processes
	}

	/// Removes and kills every process that is no longer active. Returns
	/// how many were removed.
	pub fn scrub_table(&self) -> usize {
		let mut reaped = Vec::new();
		self.table.retain(|_, process| {
			if process.get_state().is_active() {
				true
			} else {
				reaped.push(Arc::clone(process));
				false
			}
		});

		for process in &reaped {
			process.kill();
		}
		if !reaped.is_empty() {
			debug!(reaped = reaped.len(), remaining = self.table.len(), "process table scrubbed");
		}
		reaped.len()
	}

	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Kills every process and waits for their threads.
	pub fn shutdown(&self) {
		let processes: Vec<_> = self.table.iter().map(|entry| Arc::clone(entry.value())).collect();
		self.table.clear();
		for process in &processes {
			process.join();
		}
		debug!(processes = processes.len(), "kernel shut down");
	}
}

impl Drop for Kernel {
	fn drop(&mut self) {
		for entry in self.table.iter() {
			entry.value().kill();
		}
	}
}
