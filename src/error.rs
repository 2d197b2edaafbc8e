// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use std::{fmt, io};

/// The category of a [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// The shared library could not be opened.
	LoadFailure,
	/// The library does not export the requested symbol.
	SymbolNotFound,
	/// The symbol name contains an interior NUL byte.
	InvalidName,
	/// The OS refused to release the library handle.
	CloseFailure,
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ErrorKind::LoadFailure => "failed to load library",
			ErrorKind::SymbolNotFound => "symbol not found",
			ErrorKind::InvalidName => "invalid symbol name",
			ErrorKind::CloseFailure => "failed to close library",
		})
	}
}

/// The error type for loading, resolving and closing.
///
/// The subject is the library path or the symbol name the operation was given,
/// and the source is the reason reported by the OS loader.
#[derive(Debug, thiserror::Error)]
#[error("{kind} `{subject}`: {source}")]
pub struct Error {
	kind: ErrorKind,
	subject: String,
	#[source]
	source: io::Error,
}

impl Error {
	#[inline]
	pub(crate) fn new(kind: ErrorKind, subject: impl Into<String>, source: io::Error) -> Self {
		Self {
			kind,
			subject: subject.into(),
			source,
		}
	}

	#[inline]
	pub const fn kind(&self) -> ErrorKind {
		self.kind
	}

	/// The path or symbol name the failed operation was given.
	#[inline]
	pub fn subject(&self) -> &str {
		&self.subject
	}

	/// The reason reported by the OS loader.
	#[inline]
	pub fn os_error(&self) -> &io::Error {
		&self.source
	}
}

impl From<Error> for io::Error {
	fn from(err: Error) -> Self {
		let kind = match err.kind {
			ErrorKind::LoadFailure | ErrorKind::SymbolNotFound => io::ErrorKind::NotFound,
			ErrorKind::InvalidName => io::ErrorKind::InvalidInput,
			ErrorKind::CloseFailure => io::ErrorKind::Other,
		};
		io::Error::new(kind, err)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_names_kind_and_subject() {
		let err = Error::new(
			ErrorKind::SymbolNotFound,
			"subtract",
			io::Error::new(io::ErrorKind::Other, "undefined symbol: subtract"),
		);
		assert_eq!(
			err.to_string(),
			"symbol not found `subtract`: undefined symbol: subtract"
		);
		assert_eq!(err.kind(), ErrorKind::SymbolNotFound);
		assert_eq!(err.subject(), "subtract");
	}

	#[test]
	fn converts_into_io_error() {
		let err = Error::new(
			ErrorKind::InvalidName,
			"a\0b",
			io::Error::new(io::ErrorKind::InvalidInput, "nul byte"),
		);
		let io_err: io::Error = err.into();
		assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
	}
}
