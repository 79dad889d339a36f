// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::{Executable, Version};
use crate::instruction::{AssertMode, IfMode, Instruction, MathOp};

/// Assembles an [`Executable`] instruction by instruction.
///
/// `build` runs a link pass over the finished sequence: a `Fetch` directly
/// followed by an `Assert` is marked optional, so a missing variable yields
/// an empty `left` for the assertion to test instead of an error.
#[derive(Debug, Clone)]
pub struct ExecutableBuilder {
	executable: Executable,
}

impl ExecutableBuilder {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			executable: Executable {
				name: name.into(),
				uid: String::new(),
				kind: String::new(),
				note: String::new(),
				version: Version::default(),
				instructions: Vec::new(),
				output_var: None,
			},
		}
	}

	pub fn uid(mut self, uid: impl Into<String>) -> Self {
		self.executable.uid = uid.into();
		self
	}

	pub fn kind(mut self, kind: impl Into<String>) -> Self {
		self.executable.kind = kind.into();
		self
	}

	pub fn note(mut self, note: impl Into<String>) -> Self {
		self.executable.note = note.into();
		self
	}

	pub fn version(mut self, major: u16, minor: u16) -> Self {
		self.executable.version = Version::new(major, minor);
		self
	}

	pub fn output(mut self, variable: impl Into<String>) -> Self {
		self.executable.output_var = Some(variable.into());
		self
	}

	/// Index the next pushed instruction will occupy.
	pub fn position(&self) -> usize {
		self.executable.instructions.len()
	}

	pub fn instruction(mut self, instruction: Instruction) -> Self {
		self.executable.instructions.push(instruction);
		self
	}

	pub fn call(self, name: impl Into<String>) -> Self {
		self.instruction(Instruction::Call(name.into()))
	}

	pub fn method(self, instance: impl Into<String>, method: impl Into<String>) -> Self {
		self.instruction(Instruction::Method {
			instance: instance.into(),
			method: method.into(),
		})
	}

	pub fn clear_buffer(self, name: impl Into<String>) -> Self {
		self.instruction(Instruction::ClearBuffer(name.into()))
	}

	pub fn eval(self, template: impl Into<String>) -> Self {
		self.instruction(Instruction::Eval(template.into()))
	}

	pub fn exec(self, class: impl Into<String>) -> Self {
		self.instruction(Instruction::Exec(class.into()))
	}

	pub fn fault(self) -> Self {
		self.instruction(Instruction::Fault)
	}

	pub fn fetch(self, name: impl Into<String>) -> Self {
		self.instruction(Instruction::Fetch {
			name: name.into(),
			optional: false,
		})
	}

	pub fn if_(self, mode: IfMode, target: usize) -> Self {
		self.instruction(Instruction::If {
			target,
			mode,
		})
	}

	pub fn assert(self, mode: AssertMode, target: usize) -> Self {
		self.instruction(Instruction::Assert {
			target,
			mode,
		})
	}

	pub fn jump(self, target: usize) -> Self {
		self.instruction(Instruction::Jump(target))
	}

	pub fn goto(self, target: usize) -> Self {
		self.instruction(Instruction::Goto(target))
	}

	pub fn load(self, literal: impl Into<String>) -> Self {
		self.instruction(Instruction::Load(literal.into()))
	}

	pub fn math(self, op: MathOp) -> Self {
		self.instruction(Instruction::Math(op))
	}

	pub fn merge(self, buffer: impl Into<String>) -> Self {
		self.instruction(Instruction::Merge(buffer.into()))
	}

	pub fn new_buffer(self, name: impl Into<String>) -> Self {
		self.instruction(Instruction::New(name.into()))
	}

	pub fn nop(self) -> Self {
		self.instruction(Instruction::Nop)
	}

	pub fn reduce(self, buffer: impl Into<String>) -> Self {
		self.instruction(Instruction::Reduce(buffer.into()))
	}

	pub fn right_from_left(self) -> Self {
		self.instruction(Instruction::RightFromLeft)
	}

	pub fn push_scope(self) -> Self {
		self.instruction(Instruction::PushScope)
	}

	pub fn pop_scope(self) -> Self {
		self.instruction(Instruction::PopScope)
	}

	pub fn store(self, name: impl Into<String>) -> Self {
		self.instruction(Instruction::Store(name.into()))
	}

	pub fn subr_call(self, name: impl Into<String>) -> Self {
		self.instruction(Instruction::SubrCall(name.into()))
	}

	pub fn build(mut self) -> Executable {
		link(&mut self.executable.instructions);
		self.executable
	}
}

/// Marks every fetch guarded by a directly following assert as optional.
pub(super) fn link(instructions: &mut [Instruction]) {
	for idx in 1..instructions.len() {
		let guarded = matches!(instructions[idx], Instruction::Assert { .. });
		if let Instruction::Fetch {
			optional,
			..
		} = &mut instructions[idx - 1]
		{
			*optional = guarded;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_link_marks_guarded_fetch() {
		let executable = ExecutableBuilder::new("guarded")
			.fetch("a")
			.assert(AssertMode::NotEmpty, 3)
			.fetch("b")
			.store("c")
			.build();

		assert_eq!(
			executable.instructions[0],
			Instruction::Fetch {
				name: "a".to_string(),
				optional: true
			}
		);
		assert_eq!(
			executable.instructions[2],
			Instruction::Fetch {
				name: "b".to_string(),
				optional: false
			}
		);
	}

	#[test]
	fn test_trailing_fetch_is_not_optional() {
		let executable = ExecutableBuilder::new("tail").fetch("a").build();
		assert_eq!(
			executable.instructions[0],
			Instruction::Fetch {
				name: "a".to_string(),
				optional: false
			}
		);
	}

	#[test]
	fn test_metadata() {
		let executable =
			ExecutableBuilder::new("meta").uid("id").kind("job").note("n").version(2, 1).output("out").build();
		assert_eq!(executable.name, "meta");
		assert_eq!(executable.uid, "id");
		assert_eq!(executable.kind, "job");
		assert_eq!(executable.note, "n");
		assert_eq!(executable.version, Version::new(2, 1));
		assert_eq!(executable.output_var.as_deref(), Some("out"));
		assert!(executable.is_empty());
	}

	#[test]
	fn test_position() {
		let builder = ExecutableBuilder::new("p").nop().nop();
		assert_eq!(builder.position(), 2);
	}
}
