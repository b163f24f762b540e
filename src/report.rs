//! # Report Module
//!
//! Per-file outcomes of a reconciliation run and the summary derived from
//! them. The summary decides the process exit status.

use std::path::PathBuf;
use std::time::Duration;

/// Information about a processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
  /// Path to the file, as discovered
  pub path: PathBuf,
  /// What happened to the file
  pub action: FileAction,
}

/// Possible outcomes for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
  /// The expected header was already in place
  NoActionNeeded,
  /// Dry run: the file has no usable header
  MissingHeader,
  /// Dry run: the file's header must be updated
  OutdatedHeader,
  /// A new header was written to the file
  Added,
  /// The file's existing header was replaced
  Updated,
  /// The file could not be checked or rewritten
  Failed(String),
}

/// Summary statistics for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
  /// Number of files looked at
  pub total_files: usize,
  /// Files already carrying the current header
  pub files_ok: usize,
  /// Files without a usable header (reported or fixed)
  pub files_missing: usize,
  /// Files with an outdated header (reported or fixed)
  pub files_outdated: usize,
  /// Files that failed to process
  pub files_failed: usize,
  /// Wall time of the run
  pub elapsed: Duration,
}

impl ProcessingSummary {
  /// Builds the summary from per-file reports.
  pub fn from_reports(reports: &[FileReport], elapsed: Duration) -> Self {
    let mut summary = Self {
      total_files: reports.len(),
      elapsed,
      ..Self::default()
    };

    for report in reports {
      match report.action {
        FileAction::NoActionNeeded => summary.files_ok += 1,
        FileAction::MissingHeader | FileAction::Added => summary.files_missing += 1,
        FileAction::OutdatedHeader | FileAction::Updated => summary.files_outdated += 1,
        FileAction::Failed(_) => summary.files_failed += 1,
      }
    }

    summary
  }

  /// `0` when every file already carried a current header, `1` otherwise.
  pub const fn exit_code(&self) -> u8 {
    if self.files_ok == self.total_files { 0 } else { 1 }
  }
}
