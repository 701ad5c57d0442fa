//! Stderr diagnostics for the CLI shell.
//!
//! The validation core never prints; everything user-facing about a
//! document goes through [`crate::report`]. These helpers are for the
//! binary only: notices that should not abort a run, and the prefix for
//! fatal messages.

/// Print a non-fatal notice to stderr.
pub fn warn(msg: impl AsRef<str>) {
    eprintln!("WARN: {}", msg.as_ref());
}

/// Format a fatal error message for display.
pub fn error_message(msg: impl Into<String>) -> String {
    format!("ERROR: {}", msg.into())
}
