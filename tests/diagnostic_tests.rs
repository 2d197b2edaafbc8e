use std::io;
use std::process::Command;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
	fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
	}
}

impl io::Write for Capture {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}
	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl<'a> MakeWriter<'a> for Capture {
	type Writer = Capture;
	fn make_writer(&'a self) -> Self::Writer {
		self.clone()
	}
}

fn capture<F: FnOnce()>(f: F) -> String {
	let out = Capture::default();
	let subscriber = tracing_subscriber::fmt()
		.with_writer(out.clone())
		.with_ansi(false)
		.with_max_level(tracing::Level::DEBUG)
		.finish();
	tracing::subscriber::with_default(subscriber, f);
	out.contents()
}

// Set in the child process that `in_child` spawns.
const CHILD_ENV: &str = "DLSHIM_DIAGNOSTIC_CHILD";

// Runs the single test `name` in a fresh copy of this binary, where no
// subscriber from the parent applies, and returns its standard error.
fn in_child(name: &str) -> String {
	let output = Command::new(std::env::current_exe().unwrap())
		.args([name, "--exact", "--nocapture", "--test-threads=1"])
		.env(CHILD_ENV, "1")
		.output()
		.unwrap();
	let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
	assert!(output.status.success(), "{stderr}");
	stderr
}

#[cfg(feature = "stderr")]
#[test]
fn test_load_failure_without_subscriber_goes_to_stderr() {
	if std::env::var_os(CHILD_ENV).is_some() {
		assert!(dlshim::load("libdlshim_stderr_missing.so").is_none());
		return;
	}
	let stderr = in_child("test_load_failure_without_subscriber_goes_to_stderr");
	assert!(stderr.contains("failed to load library [libdlshim_stderr_missing.so]"), "{stderr}");
}

#[cfg(feature = "stderr")]
#[test]
fn test_load_failure_with_warnings_filtered_goes_to_stderr() {
	if std::env::var_os(CHILD_ENV).is_some() {
		let out = Capture::default();
		let subscriber = tracing_subscriber::fmt()
			.with_writer(out.clone())
			.with_max_level(tracing::Level::ERROR)
			.finish();
		tracing::subscriber::with_default(subscriber, || {
			assert!(dlshim::load("libdlshim_filtered_missing.so").is_none());
		});
		assert_eq!(out.contents(), "");
		return;
	}
	let stderr = in_child("test_load_failure_with_warnings_filtered_goes_to_stderr");
	assert!(stderr.contains("failed to load library [libdlshim_filtered_missing.so]"), "{stderr}");
}

#[test]
fn test_load_failure_names_path() {
	let log = capture(|| {
		assert!(dlshim::load("libdlshim_diag_missing.so").is_none());
	});
	assert!(log.contains("failed to load library"), "{log}");
	assert!(log.contains("libdlshim_diag_missing.so"), "{log}");
	assert!(log.contains("WARN"), "{log}");
}

#[test]
fn test_every_fallback_is_reported() {
	let log = capture(|| {
		let _ = dlshim::Library::open_first(["libdlshim_first.so", "libdlshim_second.so"]);
	});
	assert!(log.contains("libdlshim_first.so"), "{log}");
	assert!(log.contains("libdlshim_second.so"), "{log}");
}

#[cfg(any(all(target_os = "linux", target_env = "gnu"), target_os = "macos", windows))]
#[test]
fn test_missing_symbol_is_debug_only() {
	#[cfg(target_os = "linux")]
	const C_RUNTIME: &str = "libc.so.6";
	#[cfg(target_os = "macos")]
	const C_RUNTIME: &str = "/usr/lib/libSystem.B.dylib";
	#[cfg(windows)]
	const C_RUNTIME: &str = "msvcrt.dll";

	let log = capture(|| {
		let lib = dlshim::Library::open(C_RUNTIME).unwrap();
		assert!(lib.raw_symbol("dlshim_diag_not_exported").is_null());
	});
	assert!(log.contains("symbol not found"), "{log}");
	assert!(log.contains("dlshim_diag_not_exported"), "{log}");
	assert!(!log.contains("WARN"), "{log}");
}
