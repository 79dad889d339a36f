// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Loadable script programs.
//!
//! An [`Executable`] is immutable once built and shared between every VM
//! running it through an `Arc`. Executables are persisted in postcard form
//! and resolved by name through an [`ExecutableCache`].

mod builder;
mod cache;
mod loader;

use std::fmt::{self, Display, Formatter};

use automa_type::{
	Result,
	error::diagnostic::executable::{decode_failed, encode_failed},
	return_error,
};
pub use builder::ExecutableBuilder;
pub use cache::ExecutableCache;
pub use loader::{ExecutableLoader, LoadError, MemoryLoader};
use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Version {
	pub major: u16,
	pub minor: u16,
}

impl Version {
	pub const fn new(major: u16, minor: u16) -> Self {
		Self {
			major,
			minor,
		}
	}
}

impl Display for Version {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.major, self.minor)
	}
}

/// A named, immutable instruction sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executable {
	pub name: String,
	pub uid: String,
	pub kind: String,
	pub note: String,
	pub version: Version,
	pub instructions: Vec<Instruction>,
	/// Variable whose value becomes `left` in the caller when this
	/// executable returns from a subroutine call.
	pub output_var: Option<String>,
}

impl Executable {
	pub fn len(&self) -> usize {
		self.instructions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.instructions.is_empty()
	}

	pub fn get(&self, ip: usize) -> Option<&Instruction> {
		self.instructions.get(ip)
	}

	pub fn encode(&self) -> Result<Vec<u8>> {
		match postcard::to_stdvec(self) {
			Ok(bytes) => Ok(bytes),
			Err(err) => return_error!(encode_failed(&self.name, err.to_string())),
		}
	}

	/// Decodes an executable persisted under `name`. Guarded fetches are
	/// relinked, the persisted flags are not trusted.
	pub fn decode(name: &str, bytes: &[u8]) -> Result<Self> {
		match postcard::from_bytes::<Executable>(bytes) {
			Ok(mut executable) => {
				builder::link(&mut executable.instructions);
				Ok(executable)
			}
			Err(err) => return_error!(decode_failed(name, err.to_string())),
		}
	}

	/// Human readable listing, one instruction per line.
	pub fn disassemble(&self) -> String {
		let mut out = format!("; {} v{}\n", self.name, self.version);
		for (ip, instruction) in self.instructions.iter().enumerate() {
			out.push_str(&format!("{ip:04}  {instruction}\n"));
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::instruction::{AssertMode, MathOp};

	fn sample() -> Executable {
		ExecutableBuilder::new("sample")
			.uid("u-1")
			.kind("script")
			.version(1, 2)
			.output("r")
			.load("3")
			.right_from_left()
			.load("4")
			.math(MathOp::Add)
			.store("r")
			.build()
	}

	#[test]
	fn test_encode_decode() {
		let executable = sample();
		let bytes = executable.encode().unwrap();
		let decoded = Executable::decode("sample", &bytes).unwrap();
		assert_eq!(decoded, executable);
	}

	#[test]
	fn test_decode_relinks_guarded_fetch() {
		let mut executable = ExecutableBuilder::new("guarded").fetch("a").assert(AssertMode::NotEmpty, 2).load("x").build();
		executable.instructions[0] = Instruction::Fetch {
			name: "a".to_string(),
			optional: false,
		};

		let bytes = executable.encode().unwrap();
		let decoded = Executable::decode("guarded", &bytes).unwrap();
		assert_eq!(
			decoded.instructions[0],
			Instruction::Fetch {
				name: "a".to_string(),
				optional: true
			}
		);
	}

	#[test]
	fn test_decode_garbage() {
		let err = Executable::decode("broken", &[0xff, 0xff, 0xff]).unwrap_err();
		assert_eq!(err.code(), "EXEC_002");
		assert!(err.message.contains("broken"));
	}

	#[test]
	fn test_disassemble() {
		let listing = sample().disassemble();
		assert!(listing.starts_with("; sample v1.2"));
		assert!(listing.contains("0003  math +"));
		assert!(listing.contains("0004  store r"));
	}
}
