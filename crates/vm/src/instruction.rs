// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The instruction set executed by [`SimVm`](crate::SimVm).

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// A single script instruction.
///
/// Branch targets are absolute instruction indices inside the executable
/// that carries the instruction. A target equal to the executable length
/// is legal and means "fall off the end".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
	/// Invoke a named library operation, result into `left`.
	Call(String),
	/// Invoke a method on a named module instance, result into `left`.
	Method {
		instance: String,
		method: String,
	},
	/// Empty a named buffer.
	ClearBuffer(String),
	/// Substitute `${name}` references in the template into `left`.
	Eval(String),
	/// Instantiate a module class, persisting it under the name held in `left`.
	Exec(String),
	/// Raise a Fault at this position.
	Fault,
	/// Copy a variable into `left`.
	///
	/// `optional` is set by the link pass when the next instruction is an
	/// `Assert`, which turns a missing variable into an empty `left`.
	Fetch {
		name: String,
		optional: bool,
	},
	/// Fall through when `left` satisfies the comparison, branch otherwise.
	If {
		target: usize,
		mode: IfMode,
	},
	/// Fall through when `left` satisfies the assertion, branch otherwise.
	Assert {
		target: usize,
		mode: AssertMode,
	},
	/// Unconditional branch without scope bookkeeping.
	Jump(usize),
	/// Unconditional branch that rebalances scope frames.
	Goto(usize),
	/// Place a literal into `left`.
	Load(String),
	/// Integer arithmetic on `left` and `right`, result into `left`.
	Math(MathOp),
	/// Append `left` to a named buffer.
	Merge(String),
	/// Bind an empty buffer under a name.
	New(String),
	Nop,
	/// Collapse a named buffer into `left`.
	Reduce(String),
	/// Copy `left` into `right`.
	RightFromLeft,
	/// Discard every binding made since the matching `PushScope`.
	PopScope,
	/// Open a new scope frame.
	PushScope,
	/// Bind `left` under a name, replacing an existing binding in place.
	Store(String),
	/// Call another executable as a subroutine.
	SubrCall(String),
}

impl Instruction {
	pub fn mnemonic(&self) -> &'static str {
		match self {
			Instruction::Call(_) => "call",
			Instruction::Method {
				..
			} => "method",
			Instruction::ClearBuffer(_) => "clearbuffer",
			Instruction::Eval(_) => "eval",
			Instruction::Exec(_) => "exec",
			Instruction::Fault => "fault",
			Instruction::Fetch {
				..
			} => "fetch",
			Instruction::If {
				..
			} => "if",
			Instruction::Assert {
				..
			} => "assert",
			Instruction::Jump(_) => "jump",
			Instruction::Goto(_) => "goto",
			Instruction::Load(_) => "load",
			Instruction::Math(_) => "math",
			Instruction::Merge(_) => "merge",
			Instruction::New(_) => "new",
			Instruction::Nop => "nop",
			Instruction::Reduce(_) => "reduce",
			Instruction::RightFromLeft => "rightfromleft",
			Instruction::PopScope => "popscope",
			Instruction::PushScope => "pushscope",
			Instruction::Store(_) => "store",
			Instruction::SubrCall(_) => "subrcall",
		}
	}

	/// Branch target of a control-flow instruction.
	pub fn target(&self) -> Option<usize> {
		match self {
			Instruction::If {
				target,
				..
			}
			| Instruction::Assert {
				target,
				..
			} => Some(*target),
			Instruction::Jump(target) | Instruction::Goto(target) => Some(*target),
			_ => None,
		}
	}
}

impl Display for Instruction {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let mnemonic = self.mnemonic();
		match self {
			Instruction::Call(name)
			| Instruction::ClearBuffer(name)
			| Instruction::Exec(name)
			| Instruction::Merge(name)
			| Instruction::New(name)
			| Instruction::Reduce(name)
			| Instruction::Store(name)
			| Instruction::SubrCall(name) => write!(f, "{mnemonic} {name}"),
			Instruction::Eval(template) | Instruction::Load(template) => write!(f, "{mnemonic} {template:?}"),
			Instruction::Method {
				instance,
				method,
			} => write!(f, "{mnemonic} {instance}.{method}"),
			Instruction::Fetch {
				name,
				optional,
			} => {
				if *optional {
					write!(f, "{mnemonic} {name}?")
				} else {
					write!(f, "{mnemonic} {name}")
				}
			}
			Instruction::If {
				target,
				mode,
			} => write!(f, "{mnemonic} {mode} @{target}"),
			Instruction::Assert {
				target,
				mode,
			} => write!(f, "{mnemonic} {mode} @{target}"),
			Instruction::Jump(target) | Instruction::Goto(target) => write!(f, "{mnemonic} @{target}"),
			Instruction::Math(op) => write!(f, "{mnemonic} {op}"),
			Instruction::Fault
			| Instruction::Nop
			| Instruction::RightFromLeft
			| Instruction::PopScope
			| Instruction::PushScope => f.write_str(mnemonic),
		}
	}
}

/// Integer comparison applied by `If` to `left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IfMode {
	EqualZero,
	NotZero,
	GreaterEqualZero,
	LessEqualZero,
}

impl IfMode {
	pub fn holds(&self, value: i64) -> bool {
		match self {
			IfMode::EqualZero => value == 0,
			IfMode::NotZero => value != 0,
			IfMode::GreaterEqualZero => value >= 0,
			IfMode::LessEqualZero => value <= 0,
		}
	}
}

impl Display for IfMode {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			IfMode::EqualZero => "==0",
			IfMode::NotZero => "!=0",
			IfMode::GreaterEqualZero => ">=0",
			IfMode::LessEqualZero => "<=0",
		})
	}
}

/// Emptiness check applied by `Assert` to `left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssertMode {
	Empty,
	NotEmpty,
}

impl AssertMode {
	pub fn holds(&self, empty: bool) -> bool {
		match self {
			AssertMode::Empty => empty,
			AssertMode::NotEmpty => !empty,
		}
	}
}

impl Display for AssertMode {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			AssertMode::Empty => "empty",
			AssertMode::NotEmpty => "notempty",
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathOp {
	Add,
	Subtract,
	Multiply,
	Divide,
	/// Difference of the operands, so `If EqualZero` can test equality.
	Equal,
}

impl MathOp {
	pub fn from_symbol(symbol: &str) -> Option<Self> {
		match symbol {
			"+" => Some(MathOp::Add),
			"-" => Some(MathOp::Subtract),
			"*" => Some(MathOp::Multiply),
			"/" => Some(MathOp::Divide),
			"=" => Some(MathOp::Equal),
			_ => None,
		}
	}

	pub fn symbol(&self) -> &'static str {
		match self {
			MathOp::Add => "+",
			MathOp::Subtract => "-",
			MathOp::Multiply => "*",
			MathOp::Divide => "/",
			MathOp::Equal => "=",
		}
	}
}

impl Display for MathOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_if_modes() {
		assert!(IfMode::EqualZero.holds(0));
		assert!(!IfMode::EqualZero.holds(3));
		assert!(IfMode::NotZero.holds(-1));
		assert!(IfMode::GreaterEqualZero.holds(0));
		assert!(!IfMode::GreaterEqualZero.holds(-2));
		assert!(IfMode::LessEqualZero.holds(-2));
		assert!(!IfMode::LessEqualZero.holds(1));
	}

	#[test]
	fn test_assert_modes() {
		assert!(AssertMode::Empty.holds(true));
		assert!(AssertMode::NotEmpty.holds(false));
		assert!(!AssertMode::NotEmpty.holds(true));
	}

	#[test]
	fn test_math_symbols() {
		for symbol in ["+", "-", "*", "/", "="] {
			let op = MathOp::from_symbol(symbol).unwrap();
			assert_eq!(op.symbol(), symbol);
		}
		assert_eq!(MathOp::from_symbol("%"), None);
	}

	#[test]
	fn test_display() {
		let fetch = Instruction::Fetch {
			name: "x".to_string(),
			optional: true,
		};
		assert_eq!(fetch.to_string(), "fetch x?");
		assert_eq!(Instruction::Goto(4).to_string(), "goto @4");
		assert_eq!(Instruction::Math(MathOp::Divide).to_string(), "math /");
		assert_eq!(Instruction::PushScope.to_string(), "pushscope");
	}

	#[test]
	fn test_target() {
		assert_eq!(Instruction::Jump(7).target(), Some(7));
		assert_eq!(
			Instruction::Assert {
				target: 2,
				mode: AssertMode::Empty
			}
			.target(),
			Some(2)
		);
		assert_eq!(Instruction::Nop.target(), None);
	}
}
