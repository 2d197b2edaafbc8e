// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::ffi::{c_void, CStr, OsStr};
use std::io;
use std::ptr::NonNull;

use crate::os::imp;

/// The platform dynamic loader behind [`Library`](crate::Library).
///
/// `System` is the implementation for the host OS. `Loader` can also be used
/// to make custom loaders.
///
/// # Safety
///
/// An implementor must return addresses from [`symbol`](Loader::symbol) that stay
/// valid for as long as the implementing value has not been closed.
pub unsafe trait Loader: Send + Sync + Sized {
	/// Attempts to open the shared library at `path`.
	///
	/// Loading a library runs its initialization routines.
	unsafe fn open(path: &OsStr) -> io::Result<Self>;
	/// Opens the image of the running process.
	unsafe fn this() -> io::Result<Self>;
	/// Retrieves the raw address of an exported symbol.
	///
	/// # Safety
	///
	/// `self` must not have been closed. The lookup itself performs no check on
	/// the handle; an invalid handle is undefined behavior in the OS call.
	unsafe fn symbol(&self, name: &CStr) -> io::Result<NonNull<c_void>>;
	/// Releases the library, decrementing the OS reference count.
	unsafe fn close(self) -> io::Result<()>;
}

/// An object providing access to an open shared library through the host's
/// native loader (`dlopen` family on unix, `LoadLibraryExW` family on windows).
#[derive(Debug)]
#[repr(transparent)]
pub struct System(NonNull<c_void>);

// internal type is opaque and managed by OS, so it's `Send` and `Sync` safe
unsafe impl Send for System {}
unsafe impl Sync for System {}

impl System {
	#[inline]
	pub(crate) fn as_ptr(&self) -> *mut c_void {
		self.0.as_ptr()
	}

	#[inline]
	pub(crate) fn from_ptr(handle: *mut c_void) -> Option<Self> {
		NonNull::new(handle).map(Self)
	}
}

unsafe impl Loader for System {
	/// If successful, increments the reference count of the shared library.
	unsafe fn open(path: &OsStr) -> io::Result<Self> {
		imp::dylib_open(path).map(|handle| Self(NonNull::new_unchecked(handle)))
	}

	unsafe fn this() -> io::Result<Self> {
		imp::dylib_this().map(|handle| Self(NonNull::new_unchecked(handle)))
	}

	unsafe fn symbol(&self, name: &CStr) -> io::Result<NonNull<c_void>> {
		imp::dylib_symbol(self.as_ptr(), name).map(|addr| NonNull::new_unchecked(addr))
	}

	/// When the reference count hits zero the library is unloaded.
	unsafe fn close(self) -> io::Result<()> {
		imp::dylib_close(self.as_ptr())
	}
}
