// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A script value, as held in memory and in the working registers.
///
/// Registers only ever hold `Undefined`, `Text` or `Buffer`; the other variants
/// are produced by built-in operations and live in storage.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (an unset register or a return placeholder)
	#[default]
	Undefined,
	/// An immutable string.
	Text(String),
	/// A mutable string buffer, appended to by `merge`.
	Buffer(String),
	/// A signed 8-byte integer.
	Integer(i64),
	/// An ordered list of values.
	List(Vec<Value>),
}

impl Value {
	pub fn text(text: impl Into<String>) -> Self {
		Value::Text(text.into())
	}

	pub fn buffer(text: impl Into<String>) -> Self {
		Value::Buffer(text.into())
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Value::Undefined => "undefined",
			Value::Text(_) => "text",
			Value::Buffer(_) => "buffer",
			Value::Integer(_) => "integer",
			Value::List(_) => "list",
		}
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	/// Whether the value may be loaded into a register.
	pub fn is_register_value(&self) -> bool {
		matches!(self, Value::Undefined | Value::Text(_) | Value::Buffer(_))
	}

	/// Borrowed string content of text and buffer values.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Text(text) | Value::Buffer(text) => Some(text),
			_ => None,
		}
	}

	/// Undefined, or text/buffer of zero length.
	pub fn is_empty(&self) -> bool {
		match self {
			Value::Undefined => true,
			Value::Text(text) | Value::Buffer(text) => text.is_empty(),
			Value::Integer(_) => false,
			Value::List(items) => items.is_empty(),
		}
	}

	/// Parses the string form as a signed integer.
	pub fn to_integer(&self) -> Option<i64> {
		match self {
			Value::Integer(value) => Some(*value),
			Value::Text(text) | Value::Buffer(text) => text.trim().parse().ok(),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => Ok(()),
			Value::Text(text) | Value::Buffer(text) => f.write_str(text),
			Value::Integer(value) => write!(f, "{}", value),
			Value::List(items) => {
				for (idx, item) in items.iter().enumerate() {
					if idx > 0 {
						f.write_str(",")?;
					}
					write!(f, "{}", item)?;
				}
				Ok(())
			}
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Text(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Text(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Integer(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_to_integer() {
		assert_eq!(Value::text(" 42 ").to_integer(), Some(42));
		assert_eq!(Value::buffer("-7").to_integer(), Some(-7));
		assert_eq!(Value::text("abc").to_integer(), None);
		assert_eq!(Value::Undefined.to_integer(), None);
	}

	#[test]
	fn test_is_empty() {
		assert!(Value::Undefined.is_empty());
		assert!(Value::text("").is_empty());
		assert!(!Value::buffer("x").is_empty());
		assert!(!Value::Integer(0).is_empty());
	}

	#[test]
	fn test_display_list() {
		let list = Value::List(vec![Value::from("a"), Value::Integer(2), Value::Undefined]);
		assert_eq!(list.to_string(), "a,2,");
	}
}
