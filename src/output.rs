//! # Output Module
//!
//! This module centralizes all user-facing output for head-of-apache.
//!
//! Every file that needs attention gets exactly one line on stdout, so the
//! output stays predictable for scripts. Errors go to stderr in red and are
//! never silenced; everything else is suppressed with `--quiet`.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, ProcessingSummary};
use crate::verbose_log;

/// The line printed for a file outcome, if any.
///
/// Files whose header is already current produce no line.
pub fn file_action_message(path: &Path, action: &FileAction) -> Option<String> {
  let path = path.display();
  match action {
    FileAction::NoActionNeeded => None,
    FileAction::MissingHeader => Some(format!("No license header found in '{path}'.")),
    FileAction::OutdatedHeader => Some(format!("Must update existing license header found in '{path}'.")),
    FileAction::Added => Some(format!("Applied license header to '{path}'.")),
    FileAction::Updated => Some(format!("Updated license header in '{path}'.")),
    FileAction::Failed(reason) => Some(format!("Error processing '{path}': {reason}")),
  }
}

/// Prints the outcome line for a single file.
pub fn print_file_action(path: &Path, action: &FileAction) {
  let Some(message) = file_action_message(path, action) else {
    verbose_log!("License header is current in '{}'.", path.display());
    return;
  };

  match action {
    FileAction::Failed(_) => print_error(&message),
    FileAction::MissingHeader | FileAction::OutdatedHeader => {
      if !is_quiet() {
        println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
      }
    }
    _ => {
      if !is_quiet() {
        println!("{}", message.if_supports_color(Stream::Stdout, |m| m.green()));
      }
    }
  }
}

/// Prints an error message to stderr.
pub fn print_error(message: &str) {
  eprintln!("{}", message.if_supports_color(Stream::Stderr, |m| m.red()));
}

/// Prints the run summary. Only shown in verbose mode.
///
/// Format: "Checked N files: X current, Y missing, Z outdated, W failed (Tms)"
pub fn print_summary(summary: &ProcessingSummary, dry_run: bool) {
  if !is_verbose() {
    return;
  }

  let verb = if dry_run { "Checked" } else { "Processed" };
  let files_word = if summary.total_files == 1 { "file" } else { "files" };
  let failed = if summary.files_failed > 0 {
    summary
      .files_failed
      .if_supports_color(Stream::Stderr, |s| s.red())
      .to_string()
  } else {
    summary.files_failed.to_string()
  };

  eprintln!(
    "{} {} {}: {} current, {} missing, {} outdated, {} failed ({}ms)",
    verb,
    summary.total_files,
    files_word,
    summary.files_ok,
    summary.files_missing,
    summary.files_outdated,
    failed,
    summary.elapsed.as_millis()
  );
}
