//! # Processor Module
//!
//! This module contains the reconciliation of license headers: reading each
//! file's leading lines, classifying its header and, outside of dry runs,
//! rewriting the file with the expected header.
//!
//! The module is organized into several submodules:
//! - [`header_reader`] - Preamble and header candidate extraction
//! - [`file_io`] - File reading and atomic replacement
//! - [`file_collector`] - Directory traversal, extension filtering and exclusion
//!
//! The [`Reconciler`] struct is the main entry point, orchestrating the
//! submodules together with the validator from
//! [`license_detection`](crate::license_detection).

mod file_collector;
mod file_io;
mod header_reader;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
pub use file_collector::{FileCollector, absolutize_path};
pub use file_io::FileIO;
pub use header_reader::{FileHeaderSnapshot, PreambleKind, read_header};
use tracing::debug;

use crate::license_detection::{HeaderStatus, HeaderValidator, MatchThresholds, ValidationResult};
use crate::output;
use crate::report::{FileAction, FileReport, ProcessingSummary};
use crate::templates::{LICENSE_LENGTH, StyleRegistry, render, to_text};

/// Configuration for creating a [`Reconciler`].
pub struct ReconcilerConfig {
  /// Comment styles and the extensions they apply to
  pub registry: StyleRegistry,
  /// Author the header must be attributed to
  pub author: String,
  /// Year used to close year ranges
  pub current_year: i32,
  /// Only report, never modify files
  pub dry_run: bool,
  /// End year ranges with `present` instead of the current year
  pub last_year_present: bool,
  /// Similarity limits for header classification
  pub thresholds: MatchThresholds,
}

impl ReconcilerConfig {
  /// Creates a config with required fields and defaults for the rest.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ReconcilerConfig {
  ///     dry_run: true,
  ///     ..ReconcilerConfig::new(registry, "Jane Doe", 2025)
  /// }
  /// ```
  pub fn new(registry: StyleRegistry, author: impl Into<String>, current_year: i32) -> Self {
    Self {
      registry,
      author: author.into(),
      current_year,
      dry_run: false,
      last_year_present: false,
      thresholds: MatchThresholds::default(),
    }
  }
}

/// A file's header snapshot, its classification and the header it should
/// carry.
#[derive(Debug, Clone)]
pub struct Inspection {
  pub snapshot: FileHeaderSnapshot,
  pub validation: ValidationResult,
  /// The rendered header for the resolved year expression
  pub expected_header: Vec<String>,
}

/// Checks and fixes license headers, one file at a time.
pub struct Reconciler {
  registry: StyleRegistry,
  validator: HeaderValidator,
  current_year: i32,
  dry_run: bool,
}

impl Reconciler {
  pub fn new(config: ReconcilerConfig) -> Self {
    let validator = HeaderValidator::new(config.author, config.current_year, config.last_year_present)
      .with_thresholds(config.thresholds);

    Self {
      registry: config.registry,
      validator,
      current_year: config.current_year,
      dry_run: config.dry_run,
    }
  }

  /// Collects the files under `roots` that have a mapped extension and are
  /// not excluded.
  pub fn collect_files(&self, roots: &[PathBuf], excludes: &[PathBuf]) -> Result<Vec<PathBuf>> {
    FileCollector::new(self.registry.extensions(), excludes)?.collect(roots)
  }

  /// Collects and reconciles all files under `roots`.
  ///
  /// # Errors
  ///
  /// Returns an error only if file collection fails; per-file failures are
  /// reported and counted in the summary.
  pub fn process(&self, roots: &[PathBuf], excludes: &[PathBuf]) -> Result<ProcessingSummary> {
    let start_time = Instant::now();
    let files = self.collect_files(roots, excludes)?;
    debug!("Reconciling {} files", files.len());

    let reports = self.reconcile(&files);
    Ok(ProcessingSummary::from_reports(&reports, start_time.elapsed()))
  }

  /// Reconciles each file in order, printing one line for every file that
  /// needs attention. A failing file does not stop the run.
  pub fn reconcile(&self, files: &[PathBuf]) -> Vec<FileReport> {
    files
      .iter()
      .map(|path| {
        let action = self
          .reconcile_file(path)
          .unwrap_or_else(|e| FileAction::Failed(format!("{e:#}")));
        output::print_file_action(path, &action);
        FileReport {
          path: path.clone(),
          action,
        }
      })
      .collect()
  }

  /// Reconciles a single file.
  pub fn reconcile_file(&self, path: &Path) -> Result<FileAction> {
    let inspection = self.inspect(path)?;
    let status = inspection.validation.status();
    debug!("{}: {:?}", path.display(), status);

    match (status, self.dry_run) {
      (HeaderStatus::Current, _) => Ok(FileAction::NoActionNeeded),
      (HeaderStatus::Missing, true) => Ok(FileAction::MissingHeader),
      (HeaderStatus::Stale, true) => Ok(FileAction::OutdatedHeader),
      (HeaderStatus::Missing | HeaderStatus::Stale, false) => {
        let replace_existing = status == HeaderStatus::Stale;
        let content = FileIO::read_full_content(path)?;
        let new_content = rewrite_content(
          &content,
          inspection.snapshot.preamble.len(),
          replace_existing,
          &inspection.expected_header,
        );
        FileIO::replace_atomically(path, &new_content)?;

        Ok(if replace_existing {
          FileAction::Updated
        } else {
          FileAction::Added
        })
      }
    }
  }

  /// Reads and classifies a file's header without modifying it.
  pub fn inspect(&self, path: &Path) -> Result<Inspection> {
    let style = self.registry.style_for_path(path)?;
    let reader = FileIO::open_buffered(path)?;
    let snapshot =
      read_header(reader, style, LICENSE_LENGTH).with_context(|| format!("Failed to read header of {}", path.display()))?;

    let validation = self.validator.validate(&snapshot, style);
    let years = validation.year_expr(self.current_year).to_string();
    let expected_header = render(self.validator.author(), &years, style);

    Ok(Inspection {
      snapshot,
      validation,
      expected_header,
    })
  }
}

/// Builds the new file content: preamble, header, then the remaining body.
///
/// With `replace_existing` the old header (the [`LICENSE_LENGTH`] lines after
/// the preamble) is dropped; otherwise everything after the preamble is kept
/// below the new header. A blank line separates header and body unless the
/// body is empty or already starts with one. Inserted lines use the file's
/// line ending, taken from its first line.
fn rewrite_content(content: &str, preamble_len: usize, replace_existing: bool, header: &[String]) -> String {
  let lines: Vec<&str> = content.split_inclusive('\n').collect();
  let line_ending = match lines.first() {
    Some(line) if line.ends_with("\r\n") => "\r\n",
    _ => "\n",
  };
  let preamble_len = preamble_len.min(lines.len());
  let body_start = if replace_existing {
    (preamble_len + LICENSE_LENGTH).min(lines.len())
  } else {
    preamble_len
  };

  let mut result = String::with_capacity(content.len() + header.len() * 80);
  for line in &lines[..preamble_len] {
    result.push_str(line);
    if !line.ends_with('\n') {
      result.push_str(line_ending);
    }
  }

  result.push_str(&to_text(header, line_ending));

  let body = &lines[body_start..];
  if body.first().is_some_and(|line| !line.trim().is_empty()) {
    result.push_str(line_ending);
  }
  for line in body {
    result.push_str(line);
  }

  result
}

#[cfg(test)]
mod tests {
  use super::*;

  fn header() -> Vec<String> {
    vec!["# H1".to_string(), "# H2".to_string()]
  }

  #[test]
  fn test_rewrite_inserts_after_preamble() {
    let content = "#!/bin/sh\necho hi\n";
    let result = rewrite_content(content, 1, false, &header());
    assert_eq!(result, "#!/bin/sh\n# H1\n# H2\n\necho hi\n");
  }

  #[test]
  fn test_rewrite_empty_file() {
    assert_eq!(rewrite_content("", 0, false, &header()), "# H1\n# H2\n");
  }

  #[test]
  fn test_rewrite_preamble_without_newline() {
    assert_eq!(rewrite_content("#!/bin/sh", 1, false, &header()), "#!/bin/sh\n# H1\n# H2\n");
  }

  #[test]
  fn test_rewrite_keeps_existing_blank_separator() {
    let result = rewrite_content("\nbody\n", 0, false, &header());
    assert_eq!(result, "# H1\n# H2\n\nbody\n");
  }

  #[test]
  fn test_rewrite_replaces_existing_header() {
    let old_header: String = (0..LICENSE_LENGTH).map(|i| format!("# old {i}\n")).collect();
    let content = format!("#!/bin/sh\n{old_header}\nbody\n");

    let result = rewrite_content(&content, 1, true, &header());
    assert_eq!(result, "#!/bin/sh\n# H1\n# H2\n\nbody\n");
  }

  #[test]
  fn test_rewrite_keeps_crlf_line_endings() {
    let result = rewrite_content("#!/bin/sh\r\necho hi\r\n", 1, false, &header());
    assert_eq!(result, "#!/bin/sh\r\n# H1\r\n# H2\r\n\r\necho hi\r\n");

    let old_header: String = (0..LICENSE_LENGTH).map(|i| format!("# old {i}\r\n")).collect();
    let result = rewrite_content(&format!("{old_header}\r\nbody\r\n"), 0, true, &header());
    assert_eq!(result, "# H1\r\n# H2\r\n\r\nbody\r\n");
  }

  #[test]
  fn test_rewrite_short_file_with_replace() {
    let result = rewrite_content("# old\n", 0, true, &header());
    assert_eq!(result, "# H1\n# H2\n");
  }
}
