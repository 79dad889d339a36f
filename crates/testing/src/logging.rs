// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::{Duration, Instant};

use automa_type::{Diagnostic, Severity};
use automa_vm::ChannelSink;
use crossbeam_channel::Receiver;
use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static TRACING: OnceCell<()> = OnceCell::new();

/// Installs a test-writer subscriber once per test binary, filtered by `RUST_LOG`.
pub fn init_tracing() {
	TRACING.get_or_init(|| {
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
		let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
	});
}

/// Receiving end of a [`ChannelSink`].
pub struct LogCapture {
	receiver: Receiver<Diagnostic>,
}

impl LogCapture {
	pub fn new() -> (ChannelSink, Self) {
		let (sink, receiver) = ChannelSink::new();
		(
			sink,
			Self {
				receiver,
			},
		)
	}

	/// Everything emitted so far.
	pub fn drain(&self) -> Vec<Diagnostic> {
		self.receiver.try_iter().collect()
	}

	pub fn codes(&self) -> Vec<String> {
		self.drain().into_iter().map(|diagnostic| diagnostic.code).collect()
	}

	/// Blocks until a diagnostic with `code` arrives, discarding others.
	pub fn wait_for_code(&self, code: &str, timeout: Duration) -> Option<Diagnostic> {
		let deadline = Instant::now() + timeout;
		loop {
			let remaining = deadline.checked_duration_since(Instant::now())?;
			match self.receiver.recv_timeout(remaining) {
				Ok(diagnostic) if diagnostic.code == code => return Some(diagnostic),
				Ok(_) => continue,
				Err(_) => return None,
			}
		}
	}

	pub fn count_at_least(&self, severity: Severity) -> usize {
		self.drain().iter().filter(|diagnostic| diagnostic.severity >= severity).count()
	}
}
