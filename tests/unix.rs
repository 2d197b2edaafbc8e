#![cfg(unix)]

use dlshim::*;

#[test]
fn test_dlerror_reason() {
	let err = Library::open("libdlshim_unix_missing.so").unwrap_err();
	let reason = err.os_error().to_string();
	assert!(reason.contains("libdlshim_unix_missing.so"), "{reason}");
}

#[cfg(target_os = "linux")]
#[test]
fn test_this_atoi() {
	use std::ffi::{c_char, c_int};

	let this = Library::this().unwrap();
	let atoi = unsafe { this.symbol::<unsafe extern "C" fn(*const c_char) -> c_int>("atoi") }.unwrap();
	let five = unsafe { atoi(b"5\0".as_ptr().cast()) };
	assert_eq!(five, 5);
	this.close().unwrap();
}

#[cfg(target_os = "linux")]
#[test]
fn test_repeated_loads_are_independent() {
	// whether the handles compare equal is up to the OS, so only their use is checked.
	let first = Library::open("libc.so.6").unwrap();
	let second = Library::open("libc.so.6").unwrap();
	first.close().unwrap();
	assert!(!second.raw_symbol("abs").is_null());
	second.close().unwrap();
}
