// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use std::os::windows::ffi::OsStrExt;
use std::{ffi, io, ptr};

use super::Handle;

mod c;

fn to_wide(path: &ffi::OsStr) -> io::Result<Vec<u16>> {
	let wide: Vec<u16> = path.encode_wide().chain(std::iter::once(0u16)).collect();
	if wide[..wide.len() - 1].contains(&0) {
		Err(io::Error::new(
			io::ErrorKind::InvalidInput,
			"path contains an interior nul character",
		))
	} else {
		Ok(wide)
	}
}

// Keeps the "missing DLL" message box from popping up while a library loads.
struct ErrorModeGuard(Option<c::DWORD>);

impl ErrorModeGuard {
	fn new() -> Self {
		let mut previous = 0;
		let ok = unsafe { c::SetThreadErrorMode(c::SEM_FAILCRITICALERRORS, &mut previous) };
		Self((ok != 0).then_some(previous))
	}
}

impl Drop for ErrorModeGuard {
	fn drop(&mut self) {
		if let Some(previous) = self.0 {
			unsafe { c::SetThreadErrorMode(previous, ptr::null_mut()) };
		}
	}
}

#[inline]
pub(crate) unsafe fn dylib_open(path: &ffi::OsStr) -> io::Result<Handle> {
	let wide_str = to_wide(path)?;
	let _guard = ErrorModeGuard::new();
	let handle = c::LoadLibraryExW(wide_str.as_ptr(), ptr::null_mut(), 0);
	if handle.is_null() {
		Err(io::Error::last_os_error())
	} else {
		Ok(handle)
	}
}

#[inline]
pub(crate) unsafe fn dylib_this() -> io::Result<Handle> {
	let mut handle: Handle = ptr::null_mut();
	// flag 0 increments the reference count, so `FreeLibrary` stays balanced.
	if c::GetModuleHandleExW(0, ptr::null(), &mut handle) == 0 {
		Err(io::Error::last_os_error())
	} else {
		Ok(handle)
	}
}

#[inline]
pub(crate) unsafe fn dylib_symbol(lib_handle: Handle, name: &ffi::CStr) -> io::Result<Handle> {
	let addr = c::GetProcAddress(lib_handle, name.as_ptr());
	if addr.is_null() {
		Err(io::Error::last_os_error())
	} else {
		Ok(addr)
	}
}

#[inline]
pub(crate) unsafe fn dylib_close(lib_handle: Handle) -> io::Result<()> {
	if c::FreeLibrary(lib_handle) == 0 {
		Err(io::Error::last_os_error())
	} else {
		Ok(())
	}
}
