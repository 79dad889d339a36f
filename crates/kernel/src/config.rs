// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

/// Configuration of a process thread.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
	/// How often a blocked process thread re-checks for kill and state queries.
	pub check_interval: Duration,
	/// Prefix of the thread name, followed by the pid.
	pub thread_name_prefix: String,
}

impl Default for ProcessConfig {
	fn default() -> Self {
		Self {
			check_interval: Duration::from_millis(10),
			thread_name_prefix: "process".to_string(),
		}
	}
}

impl ProcessConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_check_interval(mut self, interval: Duration) -> Self {
		self.check_interval = interval;
		self
	}

	pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.thread_name_prefix = prefix.into();
		self
	}
}

/// Configuration of the process table.
#[derive(Debug, Clone)]
pub struct KernelConfig {
	/// Table size above which `get` reaps finished processes.
	pub scrub_threshold: usize,
	pub process: ProcessConfig,
}

impl Default for KernelConfig {
	fn default() -> Self {
		Self {
			scrub_threshold: 64,
			process: ProcessConfig::default(),
		}
	}
}

impl KernelConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_scrub_threshold(mut self, threshold: usize) -> Self {
		self.scrub_threshold = threshold;
		self
	}

	pub fn with_process(mut self, process: ProcessConfig) -> Self {
		self.process = process;
		self
	}
}
