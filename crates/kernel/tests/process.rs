// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{sync::Arc, time::Duration};

use automa_kernel::{Process, ProcessConfig};
use automa_testing::{TestSystem, wait_for};
use automa_type::{Severity, Value};
use automa_vm::{Core, Executable, ExecutableBuilder, Interpreter, RunState, SimVm};

const TIMEOUT: Duration = Duration::from_secs(5);

fn spin() -> Executable {
	ExecutableBuilder::new("spin").nop().jump(0).build()
}

fn short() -> Executable {
	ExecutableBuilder::new("short").load("done").store("result").build()
}

fn vm(system: &TestSystem, name: &str) -> Box<dyn Interpreter> {
	let executable = system.system.executables().get(name).unwrap();
	Box::new(SimVm::new(executable))
}

fn process(system: &TestSystem) -> Process {
	Process::spawn(7, Arc::clone(&system.system), ProcessConfig::default()).unwrap()
}

fn running(process: &Process) {
	wait_for(|| process.get_state() == RunState::Running, "process should be running");
}

#[test]
fn test_runs_to_completion() {
	let system = TestSystem::new(&[short()]);
	let process = process(&system);
	assert_eq!(process.get_state(), RunState::Idle);

	assert!(process.execute(vm(&system, "short")));
	assert!(process.await_completion(TIMEOUT));
	assert_eq!(process.runs(), 1);
	assert_eq!(process.verify_state(), RunState::Done);
	assert!(process.is_alive());
}

#[test]
fn test_verify_state_while_idle() {
	let system = TestSystem::new(&[]);
	let process = process(&system);
	assert_eq!(process.verify_state(), RunState::Idle);
	assert_eq!(process.verify_state(), RunState::Idle);
}

#[test]
fn test_pause_is_observed_by_verify_state() {
	let system = TestSystem::new(&[spin()]);
	let process = process(&system);

	assert!(process.execute(vm(&system, "spin")));
	running(&process);

	assert!(process.pause());
	assert_eq!(process.verify_state(), RunState::Paused);
	assert_eq!(process.get_state(), RunState::Paused);
	// still paused on a second look
	assert_eq!(process.verify_state(), RunState::Paused);

	assert!(process.resume());
	assert_eq!(process.verify_state(), RunState::Running);

	assert!(process.stop());
	assert!(process.await_completion(TIMEOUT));
	assert_eq!(process.verify_state(), RunState::Done);
}

#[test]
fn test_stop_while_paused() {
	let system = TestSystem::new(&[spin()]);
	let process = process(&system);

	assert!(process.execute(vm(&system, "spin")));
	running(&process);
	assert!(process.pause());
	assert_eq!(process.verify_state(), RunState::Paused);

	assert!(process.stop());
	assert!(process.await_completion(TIMEOUT));
	assert_eq!(process.get_state(), RunState::Done);
	assert_eq!(process.runs(), 1);
}

#[test]
fn test_execute_rejects_second_vm_and_process_is_reusable() {
	let system = TestSystem::new(&[spin(), short()]);
	let process = process(&system);

	assert!(process.execute(vm(&system, "spin")));
	running(&process);
	assert!(!process.execute(vm(&system, "short")));

	assert!(process.stop());
	assert!(process.await_completion(TIMEOUT));

	assert!(process.execute(vm(&system, "short")));
	assert!(process.await_completion(TIMEOUT));
	assert_eq!(process.runs(), 2);

	assert!(process.execute(vm(&system, "short")));
	assert!(process.await_completion(TIMEOUT));
	assert_eq!(process.runs(), 3);
}

#[test]
fn test_stray_resume_does_not_start_anything() {
	let system = TestSystem::new(&[short()]);
	let process = process(&system);

	assert!(process.resume());
	assert!(process.stop());
	assert_eq!(process.verify_state(), RunState::Idle);

	assert!(process.execute(vm(&system, "short")));
	assert!(process.await_completion(TIMEOUT));
	assert_eq!(process.runs(), 1);
}

#[test]
fn test_kill_is_irrevocable() {
	let system = TestSystem::new(&[spin(), short()]);
	let process = process(&system);

	assert!(process.execute(vm(&system, "spin")));
	running(&process);

	assert!(process.kill());
	assert!(!process.kill());
	assert!(!process.is_alive());
	assert_eq!(process.get_state(), RunState::Killed);
	assert_eq!(process.verify_state(), RunState::Killed);

	assert!(system.logs.wait_for_code("PROCESS_002", TIMEOUT).is_some());

	assert!(!process.execute(vm(&system, "short")));
	assert!(!process.pause());
	assert!(!process.resume());
	assert!(!process.stop());
	process.join();
}

#[test]
fn test_kill_while_idle() {
	let system = TestSystem::new(&[short()]);
	let process = process(&system);

	assert!(process.kill());
	process.join();
	assert_eq!(process.verify_state(), RunState::Killed);
	assert!(!process.execute(vm(&system, "short")));
}

#[test]
fn test_top_level_fault_ends_one_run() {
	let faulty = ExecutableBuilder::new("faulty").fault().load("unreached").build();
	let system = TestSystem::new(&[faulty, short()]);
	let process = process(&system);

	assert!(process.execute(vm(&system, "faulty")));
	let report = system.logs.wait_for_code("PROCESS_001", TIMEOUT).unwrap();
	assert_eq!(report.severity, Severity::Fault);
	assert!(process.await_completion(TIMEOUT));

	assert!(process.is_alive());
	assert!(process.execute(vm(&system, "short")));
	assert!(process.await_completion(TIMEOUT));
	assert_eq!(process.runs(), 2);
}

#[test]
fn test_prepare_failure_is_reported() {
	let broken = ExecutableBuilder::new("broken").jump(9).build();
	let system = TestSystem::new(&[broken]);
	let process = process(&system);

	assert!(process.execute(vm(&system, "broken")));
	assert!(system.logs.wait_for_code("PROCESS_001", TIMEOUT).is_some());
	assert!(process.await_completion(TIMEOUT));
	assert_eq!(process.get_state(), RunState::Done);
}

#[test]
fn test_attach_with_parent_core() {
	let program = ExecutableBuilder::new("child")
		.fetch("greeting")
		.store("arg")
		.load("reply")
		.store("obj")
		.call("env_set")
		.build();
	let system = TestSystem::new(&[program]);
	let process = process(&system);

	let mut parent = Core::standalone();
	parent.store("greeting", Value::text("hello"));

	let mut child = vm(&system, "child");
	child.attach(process.binding(), Some(&parent)).unwrap();
	assert_eq!(child.state(), RunState::New);

	assert!(process.execute(child));
	assert!(process.await_completion(TIMEOUT));
	assert_eq!(parent.env_read("reply").unwrap(), Value::text("hello"));
}

#[test]
fn test_kill_interrupts_environment_wait() {
	let program = ExecutableBuilder::new("waiter")
		.load("ready")
		.store("obj")
		.load("yes")
		.store("arg")
		.call("env_set")
		.load("door")
		.store("obj")
		.call("env_wait")
		.load("after")
		.build();
	let system = TestSystem::new(&[program]);
	let process = process(&system);

	let parent = Core::standalone();
	parent.env_set("door", Value::text("closed")).unwrap();
	assert!(parent.env_lock("door"));

	let mut waiter = vm(&system, "waiter");
	waiter.attach(process.binding(), Some(&parent)).unwrap();
	assert!(process.execute(waiter));

	wait_for(|| parent.env_read("ready").is_ok(), "waiter should have announced itself");
	assert!(process.kill());
	process.join();

	let codes = system.logs.codes();
	assert!(codes.contains(&"PROCESS_002".to_string()), "{codes:?}");
	assert!(!codes.contains(&"PROCESS_001".to_string()), "{codes:?}");
	assert_eq!(process.get_state(), RunState::Killed);
}
