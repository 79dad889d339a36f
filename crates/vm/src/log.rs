// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Where diagnostics go.
//!
//! Every condition raised while running a script is emitted to the sink of
//! the system context before its control-flow consequence is applied.

use automa_type::{Diagnostic, Severity};
use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, error, info, warn};

pub trait LogSink: Send + Sync {
	fn emit(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing`, mapping severity onto level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
	fn emit(&self, diagnostic: &Diagnostic) {
		let code = diagnostic.code.as_str();
		let message = diagnostic.message.as_str();
		match diagnostic.severity {
			Severity::Informational => debug!(code = %code, "{}", message),
			Severity::Warning => info!(code = %code, "{}", message),
			Severity::Error => warn!(code = %code, "{}", message),
			Severity::Fault | Severity::Panic => {
				error!(code = %code, severity = %diagnostic.severity, "{}", message)
			}
		}
	}
}

/// Collects diagnostics on a channel, for hosts that display or assert on them.
#[derive(Debug, Clone)]
pub struct ChannelSink {
	sender: Sender<Diagnostic>,
}

impl ChannelSink {
	pub fn new() -> (Self, Receiver<Diagnostic>) {
		let (sender, receiver) = unbounded();
		(
			Self {
				sender,
			},
			receiver,
		)
	}
}

impl LogSink for ChannelSink {
	fn emit(&self, diagnostic: &Diagnostic) {
		// receiver dropped
		let _ = self.sender.send(diagnostic.clone());
	}
}
