// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use automa_type::{Result, Value};
use automa_vm::{
	Executable, Interpreter, MemoryLoader, ProcessBinding, SimVm, SystemContext, SystemContextBuilder, VmConfig,
};

use crate::{
	library::{counter_modules, test_operations},
	logging::{LogCapture, init_tracing},
};

/// A system context over an in-memory loader, wired to the scripted
/// libraries and a capturing sink.
pub struct TestSystem {
	pub loader: Arc<MemoryLoader>,
	pub system: Arc<SystemContext>,
	pub logs: LogCapture,
}

impl TestSystem {
	pub fn new(executables: &[Executable]) -> Self {
		Self::with(executables, |builder| builder)
	}

	pub fn with_config(executables: &[Executable], config: VmConfig) -> Self {
		Self::with(executables, |builder| builder.config(config))
	}

	pub fn with_seed(executables: &[Executable], seed: &[(&str, &str)]) -> Self {
		Self::with(executables, |builder| {
			seed.iter().fold(builder, |builder, (name, value)| builder.seed(*name, Value::text(*value)))
		})
	}

	fn with(executables: &[Executable], configure: impl FnOnce(SystemContextBuilder) -> SystemContextBuilder) -> Self {
		init_tracing();

		let loader = Arc::new(MemoryLoader::new());
		for executable in executables {
			if let Err(err) = loader.insert(executable) {
				panic!("failed to store executable '{}': {}", executable.name, err);
			}
		}

		let (sink, logs) = LogCapture::new();
		let builder = SystemContext::builder(loader.clone())
			.operations(Arc::new(test_operations()))
			.modules(Arc::new(counter_modules()))
			.sink(Arc::new(sink));
		let system = configure(builder).build();

		Self {
			loader,
			system,
			logs,
		}
	}

	/// A VM for the named executable, attached outside any process.
	pub fn vm(&self, name: &str) -> SimVm {
		let executable = match self.system.executables().get(name) {
			Ok(executable) => executable,
			Err(err) => panic!("executable '{}' is not loadable: {}", name, err),
		};
		let mut vm = SimVm::new(executable);
		if let Err(err) = vm.attach(ProcessBinding::detached(Arc::clone(&self.system)), None) {
			panic!("attach failed: {}", err);
		}
		vm
	}

	/// Runs the named executable to completion on the calling thread.
	pub fn run(&self, name: &str) -> (SimVm, Result<()>) {
		let mut vm = self.vm(name);
		let result = vm.run();
		(vm, result)
	}
}
