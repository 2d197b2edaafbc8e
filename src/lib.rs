// Copyright (c) 2022 Jonathan "Razordor" Alan Thomason
//! Run-time loading of shared libraries and typed symbol binding.
//!
//! The crate exposes three operations over the host's native loader:
//! [`Library::open`] (or [`load`]), [`Library::symbol`], and [`Library::close`].
//! Resolved addresses are wrapped into typed function pointers, either borrowed
//! from the library ([`Symbol`]) or stored in a named slot ([`Binding`]).
//!
//! ```no_run
//! use dlshim::Library;
//!
//! let lib = Library::open(dlshim::library_filename("math_ops")).unwrap();
//! let add = unsafe { lib.symbol::<unsafe extern "C" fn(i32, i32) -> i32>("add").unwrap() };
//! assert_eq!(unsafe { add(2, 3) }, 5);
//! assert!(lib.raw_symbol("subtract").is_null());
//! lib.close().unwrap();
//! ```
//!
//! # Declaring bindings
//!
//! The [`declare`] attribute turns the functions of an `extern` block into
//! `static` [`Binding`]s. The symbol name is the function name, or the value of
//! `#[link_name]` when given.
//!
//! ```no_run
//! use dlshim::{declare, Library};
//!
//! #[declare]
//! extern "C" {
//!     fn add(a: i32, b: i32) -> i32;
//!     #[link_name = "sub"]
//!     fn subtract(a: i32, b: i32) -> i32;
//! }
//!
//! let lib = Library::open("libmath_ops.so").unwrap();
//! unsafe {
//!     add.bind(&lib).unwrap();
//!     assert_eq!(add.get().unwrap()(2, 3), 5);
//! }
//! ```
//!
//! # Exporting from Rust
//!
//! A library meant to be opened this way is a `crate-type = ["cdylib"]` crate
//! whose entry points are `#[no_mangle] pub extern "C" fn`.
#![allow(clippy::missing_safety_doc)]

use std::ffi::{OsStr, OsString};

mod binding;
mod diagnostic;
pub mod error;
pub mod load;
mod library;
mod os;
mod sealed;
mod sym;

pub use binding::Binding;
pub use dlshim_macro::declare;
pub use error::{Error, ErrorKind};
pub use library::Library;
pub use sym::{FnPtr, Symbol};

/// The result of a dlshim function
pub type Result<T> = std::result::Result<T, Error>;

/// Opens the shared library at `path`, returning `None` on failure.
///
/// This is [`Library::open`] with the error discarded. The failure diagnostic
/// naming `path` is still emitted.
#[inline]
pub fn load<P: AsRef<OsStr>>(path: P) -> Option<Library> {
	Library::open(path).ok()
}

/// Builds the platform file name for the library `name`.
///
/// `"math_ops"` becomes `libmath_ops.so` on linux, `libmath_ops.dylib` on macos
/// and `math_ops.dll` on windows.
pub fn library_filename<S: AsRef<OsStr>>(name: S) -> OsString {
	use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
	let name = name.as_ref();
	let mut file = OsString::with_capacity(DLL_PREFIX.len() + name.len() + DLL_SUFFIX.len());
	file.push(DLL_PREFIX);
	file.push(name);
	file.push(DLL_SUFFIX);
	file
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn library_filename_wraps_name() {
		let file = library_filename("math_ops");
		if cfg!(windows) {
			assert_eq!(file, "math_ops.dll");
		} else if cfg!(target_os = "macos") {
			assert_eq!(file, "libmath_ops.dylib");
		} else if cfg!(target_os = "linux") {
			assert_eq!(file, "libmath_ops.so");
		}
	}
}
