// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shared services handed to every VM, and the binding of a VM to its process.

use std::sync::Arc;

use automa_runtime::{CancellationToken, ContextId};
use automa_type::{Diagnostic, Value};

use crate::{
	config::VmConfig,
	executable::{ExecutableCache, ExecutableLoader},
	library::{BuiltinRegistry, ModuleLibrary, ModuleRegistry, OperationLibrary},
	log::{LogSink, TracingSink},
};

/// Process-wide services: the operation and module libraries, the executable
/// cache, the diagnostic sink and the variables every new core is seeded with.
pub struct SystemContext {
	operations: Arc<dyn OperationLibrary>,
	modules: Arc<dyn ModuleLibrary>,
	executables: ExecutableCache,
	sink: Arc<dyn LogSink>,
	seed: Vec<(String, Value)>,
	config: VmConfig,
}

impl SystemContext {
	pub fn builder(loader: Arc<dyn ExecutableLoader>) -> SystemContextBuilder {
		SystemContextBuilder::new(loader)
	}

	pub fn operations(&self) -> &dyn OperationLibrary {
		self.operations.as_ref()
	}

	pub fn modules(&self) -> &dyn ModuleLibrary {
		self.modules.as_ref()
	}

	pub fn executables(&self) -> &ExecutableCache {
		&self.executables
	}

	pub fn seed(&self) -> &[(String, Value)] {
		&self.seed
	}

	pub fn config(&self) -> &VmConfig {
		&self.config
	}

	pub fn emit(&self, diagnostic: &Diagnostic) {
		self.sink.emit(diagnostic);
	}
}

pub struct SystemContextBuilder {
	loader: Arc<dyn ExecutableLoader>,
	operations: Option<Arc<dyn OperationLibrary>>,
	modules: Option<Arc<dyn ModuleLibrary>>,
	sink: Option<Arc<dyn LogSink>>,
	seed: Vec<(String, Value)>,
	config: VmConfig,
}

impl SystemContextBuilder {
	pub fn new(loader: Arc<dyn ExecutableLoader>) -> Self {
		Self {
			loader,
			operations: None,
			modules: None,
			sink: None,
			seed: Vec::new(),
			config: VmConfig::default(),
		}
	}

	pub fn operations(mut self, operations: Arc<dyn OperationLibrary>) -> Self {
		self.operations = Some(operations);
		self
	}

	pub fn modules(mut self, modules: Arc<dyn ModuleLibrary>) -> Self {
		self.modules = Some(modules);
		self
	}

	pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
		self.sink = Some(sink);
		self
	}

	/// Variable bound in every core attached under this context.
	pub fn seed(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.seed.push((name.into(), value.into()));
		self
	}

	pub fn config(mut self, config: VmConfig) -> Self {
		self.config = config;
		self
	}

	pub fn build(self) -> Arc<SystemContext> {
		Arc::new(SystemContext {
			operations: self.operations.unwrap_or_else(|| Arc::new(BuiltinRegistry::new())),
			modules: self.modules.unwrap_or_else(|| Arc::new(ModuleRegistry::new())),
			executables: ExecutableCache::new(self.loader),
			sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
			seed: self.seed,
			config: self.config,
		})
	}
}

/// What a VM needs from the process it runs in.
#[derive(Clone)]
pub struct ProcessBinding {
	pub pid: u64,
	/// Context the VM's locks are taken under.
	pub context: ContextId,
	/// Cancelled when the process is killed.
	pub cancel: CancellationToken,
	pub system: Arc<SystemContext>,
}

impl ProcessBinding {
	/// Binding for running a VM inline on the calling thread, outside any process.
	pub fn detached(system: Arc<SystemContext>) -> Self {
		Self {
			pid: 0,
			context: ContextId::next(),
			cancel: CancellationToken::new(),
			system,
		}
	}
}
