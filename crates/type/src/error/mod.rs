// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::ops::{Deref, DerefMut};

pub mod diagnostic;
mod r#macro;
pub mod severity;

use diagnostic::Diagnostic;
use severity::Severity;

/// The error type of every fallible core operation.
///
/// Boxed so that `Result<T>` stays a couple of words wide on the hot
/// instruction dispatch path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct Error(pub Box<Diagnostic>);

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	pub fn new(diagnostic: Diagnostic) -> Self {
		Self(Box::new(diagnostic))
	}

	pub fn diagnostic(self) -> Diagnostic {
		*self.0
	}

	pub fn severity(&self) -> Severity {
		self.0.severity
	}

	pub fn code(&self) -> &str {
		&self.0.code
	}
}

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Error {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Self::new(diagnostic)
	}
}
