// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
#[cfg(unix)]
pub(crate) mod unix;
#[cfg(windows)]
pub(crate) mod windows;

#[cfg(unix)]
pub(crate) use unix as imp;
#[cfg(windows)]
pub(crate) use windows as imp;

use std::borrow::Cow;
use std::ffi::{self, CStr, CString};
use std::io;

/// Raw OS library handle: `void*` from `dlopen`, `HMODULE` on Windows.
pub(crate) type Handle = *mut ffi::c_void;

// Symbol names may be given with or without the trailing NUL.
pub(crate) fn to_cstr(name: &[u8]) -> io::Result<Cow<'_, CStr>> {
	match name.last() {
		Some(&0) => CStr::from_bytes_with_nul(name)
			.map(Cow::Borrowed)
			.map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e)),
		_ => Ok(Cow::Owned(CString::new(name)?)),
	}
}

// Strips the trailing NUL so names are reported the way they were written.
pub(crate) fn display_name(name: &[u8]) -> String {
	let name = name.strip_suffix(&[0]).unwrap_or(name);
	String::from_utf8_lossy(name).into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn borrows_nul_terminated_names() {
		let name = to_cstr(b"add\0").unwrap();
		assert!(matches!(name, Cow::Borrowed(_)));
		assert_eq!(name.to_bytes(), b"add");
	}

	#[test]
	fn copies_plain_names() {
		let name = to_cstr(b"add").unwrap();
		assert!(matches!(name, Cow::Owned(_)));
		assert_eq!(name.to_bytes(), b"add");
	}

	#[test]
	fn rejects_interior_nul() {
		let err = to_cstr(b"a\0dd").unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
		let err = to_cstr(b"a\0dd\0").unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
	}

	#[test]
	fn display_name_drops_terminator() {
		assert_eq!(display_name(b"add\0"), "add");
		assert_eq!(display_name(b"add"), "add");
	}
}
