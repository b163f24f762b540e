//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the processor.
//! Rewrites go through a temporary file in the target's directory which is
//! then renamed over the original, so an interrupted run never leaves a
//! half-written source file behind.

use std::fs::{self, File, FileTimes, OpenOptions};
use std::io::{BufReader, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Opens a file for buffered, line-oriented reading.
  pub fn open_buffered(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    Ok(BufReader::new(file))
  }

  /// Reads the full content of a file.
  pub fn read_full_content(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Atomically replaces the content of `path`.
  ///
  /// The content is written to a temporary file in the same directory, the
  /// original's permissions and timestamps are copied onto it (best effort),
  /// and the temporary file is then renamed over the original. If any step
  /// fails the temporary file is removed and the original is left untouched.
  pub fn replace_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)
      .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    temp
      .write_all(content.as_bytes())
      .and_then(|()| temp.as_file().sync_all())
      .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;

    // Closes the handle; the path is still deleted on drop until persisted.
    let temp_path = temp.into_temp_path();

    copy_metadata(path, &temp_path);

    temp_path
      .persist(path)
      .map_err(|e| e.error)
      .with_context(|| format!("Failed to replace file: {}", path.display()))
  }
}

/// Copies timestamps and permissions from `from` onto `to`, best effort.
///
/// The two are copied independently. Timestamps go first so a read-only mode
/// does not prevent setting them.
fn copy_metadata(from: &Path, to: &Path) {
  let metadata = match fs::metadata(from) {
    Ok(metadata) => metadata,
    Err(e) => {
      debug!("Could not read metadata of {}: {}", from.display(), e);
      return;
    }
  };

  if let Err(e) = copy_times(&metadata, to) {
    debug!("Could not copy timestamps of {}: {}", from.display(), e);
  }
  if let Err(e) = fs::set_permissions(to, metadata.permissions()) {
    debug!("Could not copy permissions of {}: {}", from.display(), e);
  }
}

/// Sets the modification time (and the access time, where the filesystem
/// records one) of `to` from `metadata`.
fn copy_times(metadata: &fs::Metadata, to: &Path) -> std::io::Result<()> {
  let mut times = FileTimes::new().set_modified(metadata.modified()?);
  if let Ok(accessed) = metadata.accessed() {
    times = times.set_accessed(accessed);
  }
  OpenOptions::new().write(true).open(to)?.set_times(times)
}
