// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

/// Wraps a [`Diagnostic`](crate::Diagnostic) into an [`Error`](crate::Error).
#[macro_export]
macro_rules! error {
	($diagnostic:expr) => {
		$crate::Error::new($diagnostic)
	};
}

/// Returns early with the given diagnostic as error.
#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return Err($crate::Error::new($diagnostic))
	};
}

/// Creates an internal error diagnostic with automatic source location capture.
///
/// Internal errors always carry [`Severity::Panic`](crate::Severity::Panic):
/// they signal a corrupted execution, not a script level problem.
#[macro_export]
macro_rules! internal_error {
	($reason:expr) => {
		$crate::error::diagnostic::internal::internal_with_context($reason, file!(), line!(), column!(), module_path!())
	};
	($fmt:expr, $($arg:tt)*) => {
		$crate::error::diagnostic::internal::internal_with_context(
			format!($fmt, $($arg)*),
			file!(),
			line!(),
			column!(),
			module_path!()
		)
	};
}

/// Returns early with an internal error.
#[macro_export]
macro_rules! return_internal_error {
	($reason:expr) => {
		return Err($crate::Error::new($crate::internal_error!($reason)))
	};
	($fmt:expr, $($arg:tt)*) => {
		return Err($crate::Error::new($crate::internal_error!($fmt, $($arg)*)))
	};
}
