//! Failure reporting.
//!
//! Load failures are always reported: as a `tracing` warning, or on standard
//! error when no subscriber records warnings (feature `stderr`). Missing symbols
//! are reported at debug level only, since looking up optional symbols is common.

use std::io;
use std::path::Path;

pub(crate) fn load_failed(path: &Path, err: &io::Error) {
	if cfg!(feature = "stderr") && !warn_is_recorded() {
		eprintln!("failed to load library [{}]: {err}", path.display());
	} else {
		tracing::warn!(path = %path.display(), error = %err, "failed to load library");
	}
}

pub(crate) fn symbol_not_found(name: &str, err: &io::Error) {
	tracing::debug!(symbol = name, error = %err, "symbol not found");
}

pub(crate) fn close_failed(err: &io::Error) {
	tracing::warn!(error = %err, "failed to close library");
}

// False without a subscriber, and when the current one filters out warnings.
fn warn_is_recorded() -> bool {
	tracing::enabled!(tracing::Level::WARN)
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracing::Level;

	#[test]
	fn nothing_recorded_by_default() {
		assert!(!warn_is_recorded());
	}

	#[test]
	fn scoped_subscriber_records_warnings() {
		let subscriber = tracing_subscriber::fmt().with_writer(io::sink).finish();
		tracing::subscriber::with_default(subscriber, || assert!(warn_is_recorded()));
	}

	#[test]
	fn error_only_subscriber_does_not_record_warnings() {
		let subscriber = tracing_subscriber::fmt()
			.with_max_level(Level::ERROR)
			.with_writer(io::sink)
			.finish();
		tracing::subscriber::with_default(subscriber, || assert!(!warn_is_recorded()));
	}
}
