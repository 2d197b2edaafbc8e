// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::ffi::{c_void, OsStr};
use std::io;
use std::mem::ManuallyDrop;
use std::path::Path;
use std::ptr::{self, NonNull};

use crate::error::{Error, ErrorKind};
use crate::load::{Loader, System};
use crate::{diagnostic, os, FnPtr, Result, Symbol};

/// An object providing access to an open shared library.
///
/// A `Library` is always a valid handle; failure to open is reported through
/// [`Result`]. The library is released by [`close`](Library::close), or when the
/// value is dropped.
#[derive(Debug)]
pub struct Library<L: Loader = System>(ManuallyDrop<L>);

impl<L: Loader> Library<L> {
	/// Opens the shared library at `path` through the loader `L`.
	///
	/// The path is passed to the OS loader unmodified, so the platform's search
	/// rules apply to bare file names. Opening a library runs its initialization
	/// routines.
	///
	/// # Errors
	///
	/// Fails with [`ErrorKind::LoadFailure`] when the file is missing, malformed,
	/// built for another architecture, or has unresolved dependencies. A
	/// diagnostic naming `path` is emitted as well.
	///
	/// # Examples
	///
	/// ```no_run
	/// use dlshim::{load::System, Library};
	///
	/// let lib = Library::<System>::open_with("libmath_ops.so").unwrap();
	/// ```
	pub fn open_with<P: AsRef<OsStr>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		match unsafe { L::open(path) } {
			Ok(inner) => {
				tracing::trace!(path = %Path::new(path).display(), "opened library");
				Ok(Self(ManuallyDrop::new(inner)))
			}
			Err(err) => {
				diagnostic::load_failed(Path::new(path), &err);
				Err(Error::new(ErrorKind::LoadFailure, path.to_string_lossy(), err))
			}
		}
	}

	/// Opens the first library in `paths` that loads, through the loader `L`.
	///
	/// This is a fallback mechanism for libraries that live in a separate
	/// directory or go by a variety of names. Every failed attempt is reported.
	///
	/// *Note: Symbols used in the libraries **must** be the same in all fallback paths.*
	///
	/// # Errors
	///
	/// Returns the last error if every path fails, or a `LoadFailure` if `paths`
	/// is empty.
	pub fn open_first_with<I, P>(paths: I) -> Result<Self>
	where
		I: IntoIterator<Item = P>,
		P: AsRef<OsStr>,
	{
		let mut last_err = None;
		for path in paths {
			match Self::open_with(path) {
				Ok(lib) => return Ok(lib),
				Err(err) => last_err = Some(err),
			}
		}
		Err(last_err.unwrap_or_else(|| {
			Error::new(
				ErrorKind::LoadFailure,
				"",
				io::Error::new(io::ErrorKind::NotFound, "no library paths were given"),
			)
		}))
	}

	/// Opens the image of the running process through the loader `L`.
	pub fn this_with() -> Result<Self> {
		match unsafe { L::this() } {
			Ok(inner) => Ok(Self(ManuallyDrop::new(inner))),
			Err(err) => Err(Error::new(ErrorKind::LoadFailure, "<this>", err)),
		}
	}

	/// Resolves the exported symbol `name` as a function pointer of type `F`.
	///
	/// `name` is matched exactly and case-sensitively. It may be given with or
	/// without a trailing NUL.
	///
	/// # Errors
	///
	/// [`ErrorKind::SymbolNotFound`] if the library does not export `name`, and
	/// [`ErrorKind::InvalidName`] if `name` contains an interior NUL.
	///
	/// # Safety
	///
	/// `F` must match the signature of the exported function. Nothing checks this.
	///
	/// # Examples
	///
	/// ```no_run
	/// use dlshim::Library;
	///
	/// let lib = Library::open("libmath_ops.so").unwrap();
	/// let add = unsafe { lib.symbol::<unsafe extern "C" fn(i32, i32) -> i32>("add").unwrap() };
	/// assert_eq!(unsafe { add(2, 3) }, 5);
	/// ```
	pub unsafe fn symbol<F: FnPtr>(&self, name: impl AsRef<[u8]>) -> Result<Symbol<'_, F>> {
		self.find(name.as_ref()).map(|addr| Symbol::new(addr))
	}

	/// Resolves the exported symbol `name` to its raw address.
	///
	/// Returns a null pointer if the symbol does not exist or `name` is invalid.
	pub fn raw_symbol(&self, name: impl AsRef<[u8]>) -> *const c_void {
		self.find(name.as_ref())
			.map_or(ptr::null(), |addr| addr.as_ptr().cast_const())
	}

	fn find(&self, name: &[u8]) -> Result<NonNull<c_void>> {
		let c_name = os::to_cstr(name)
			.map_err(|err| Error::new(ErrorKind::InvalidName, os::display_name(name), err))?;
		unsafe { self.0.symbol(&c_name) }.map_err(|err| {
			let name = os::display_name(name);
			diagnostic::symbol_not_found(&name, &err);
			Error::new(ErrorKind::SymbolNotFound, name, err)
		})
	}

	/// Closes the library.
	///
	/// Every [`Symbol`] borrowed from the library ends here. Pointers copied out
	/// of symbols, or stored in a [`Binding`](crate::Binding), must not be called
	/// afterwards.
	///
	/// # Errors
	///
	/// [`ErrorKind::CloseFailure`] if the OS loader reports an error.
	pub fn close(self) -> Result<()> {
		let mut this = ManuallyDrop::new(self);
		let inner = unsafe { ManuallyDrop::take(&mut this.0) };
		unsafe { inner.close() }
			.map(|()| tracing::trace!("closed library"))
			.map_err(|err| Error::new(ErrorKind::CloseFailure, "", err))
	}
}

impl Library<System> {
	/// Opens the shared library at `path`.
	///
	/// The path is passed to the OS loader unmodified, so the platform's search
	/// rules apply to bare file names.
	///
	/// # Errors
	///
	/// See [`open_with`](Library::open_with).
	///
	/// # Examples
	///
	/// ```no_run
	/// use dlshim::Library;
	///
	/// let lib = Library::open("libmath_ops.so").unwrap();
	/// ```
	#[inline]
	pub fn open<P: AsRef<OsStr>>(path: P) -> Result<Self> {
		Self::open_with(path)
	}

	/// Opens the first library in `paths` that loads.
	///
	/// See [`open_first_with`](Library::open_first_with).
	#[inline]
	pub fn open_first<I, P>(paths: I) -> Result<Self>
	where
		I: IntoIterator<Item = P>,
		P: AsRef<OsStr>,
	{
		Self::open_first_with(paths)
	}

	/// Opens the image of the running process, for symbols that are already loaded.
	///
	/// # Platform-specific Behavior
	///
	/// On unix this searches the executable and every library loaded with global
	/// visibility, the C runtime included. On windows only the executable's own
	/// exports are visible.
	#[inline]
	pub fn this() -> Result<Self> {
		Self::this_with()
	}

	/// Consumes the library without closing it, returning the raw OS handle.
	#[inline]
	pub fn into_raw(self) -> *mut c_void {
		let this = ManuallyDrop::new(self);
		this.0.as_ptr()
	}

	/// Takes ownership of a raw OS handle. Returns `None` for a null handle.
	///
	/// # Safety
	///
	/// `handle` must come from `dlopen` (unix) or `LoadLibrary*` (windows), or
	/// from [`into_raw`](Library::into_raw), and must not be closed elsewhere.
	#[inline]
	pub unsafe fn from_raw(handle: *mut c_void) -> Option<Self> {
		System::from_ptr(handle).map(|inner| Self(ManuallyDrop::new(inner)))
	}
}

impl<L: Loader> Drop for Library<L> {
	fn drop(&mut self) {
		let inner = unsafe { ManuallyDrop::take(&mut self.0) };
		if let Err(err) = unsafe { inner.close() } {
			diagnostic::close_failed(&err);
		}
	}
}
