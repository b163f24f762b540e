//! # Logging Module
//!
//! This module provides logging utilities for head-of-apache, including:
//! - Verbose logging that can be enabled/disabled
//! - Quiet mode and color control for user-facing output
//! - Installation of the `tracing` subscriber used for diagnostics
//!
//! Verbose logs and `tracing` diagnostics go to stderr, so the per-file
//! report lines on stdout can be piped without the diagnostics mixed in.
//!
//! ## Example
//!
//! ```rust
//! use head_of_apache::logging::{ColorMode, set_verbose};
//! use head_of_apache::verbose_log;
//!
//! // Enable verbose logging
//! set_verbose();
//!
//! // Never emit ANSI escapes
//! ColorMode::Never.apply();
//!
//! // Log a verbose message (goes to stderr)
//! verbose_log!("Processing file: {}", "example.py");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};

/// Logs a message to stderr if verbose mode is enabled.
///
/// Uses the same format string syntax as [`eprintln!`].
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}
