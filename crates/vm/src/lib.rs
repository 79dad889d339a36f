// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! automa VM - the script interpreter.
//!
//! Scripts are compiled into [`Executable`]s: flat instruction lists with
//! absolute branch targets. A [`SimVm`] executes one instruction per step
//! against a [`Core`], the VM's memory, and routes every raised condition
//! through the severity taxonomy:
//!
//! - Informational / Warning: logged, execution continues
//! - Error: logged, the instruction pointer is forced forward
//! - Fault: the current subroutine is abandoned and its caller resumes;
//!   at top level the VM terminates
//! - Panic: the VM terminates
//!
//! # Example
//!
//! ```ignore
//! use automa_vm::{ExecutableBuilder, Interpreter, MemoryLoader, ProcessBinding, SimVm, SystemContext};
//!
//! let loader = Arc::new(MemoryLoader::new());
//! let system = SystemContext::builder(loader).build();
//!
//! let program = ExecutableBuilder::new("hello").load("hi").store("greeting").build();
//! let mut vm = SimVm::new(Arc::new(program));
//! vm.attach(ProcessBinding::detached(system), None)?;
//! vm.run()?;
//! ```

pub mod config;
pub mod context;
pub mod core;
pub mod executable;
pub mod instruction;
pub mod interpreter;
pub mod library;
pub mod log;

// Handler modules (opcode handlers)
mod handler;

pub use config::VmConfig;
pub use context::{ProcessBinding, SystemContext, SystemContextBuilder};
pub use crate::core::{Core, EnvStatus, Environment, Persisted, StackEntry};
pub use executable::{Executable, ExecutableBuilder, ExecutableCache, ExecutableLoader, LoadError, MemoryLoader, Version};
pub use instruction::{AssertMode, IfMode, Instruction, MathOp};
pub use interpreter::{Interpreter, RunState, SimVm, Step};
pub use library::{BuiltinRegistry, ModuleHandle, ModuleLibrary, ModuleRegistry, Operation, OperationLibrary};
pub use log::{ChannelSink, LogSink, TracingSink};
