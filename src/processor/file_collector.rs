//! # File Collector Module
//!
//! This module finds the files to reconcile: explicit files are taken as
//! given, directories are walked recursively. Only regular files with a
//! known extension are kept, and anything at or below an excluded path is
//! dropped.

use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// File collector for directory traversal and exclusion.
pub struct FileCollector {
  /// Lowercased extensions (without the dot) that have a comment style
  extensions: HashSet<String>,
  /// Absolute, normalized excluded paths
  excludes: Vec<PathBuf>,
}

impl FileCollector {
  /// Creates a collector for the given extensions and excluded paths.
  ///
  /// Excluded paths are matched component-wise: `src/vendor` excludes
  /// `src/vendor/lib.c` but not `src/vendored.c`.
  pub fn new<I, S>(extensions: I, excludes: &[PathBuf]) -> Result<Self>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let extensions = extensions
      .into_iter()
      .map(|ext| ext.as_ref().to_lowercase())
      .collect();
    let excludes = excludes
      .iter()
      .map(|path| absolutize_path(path))
      .collect::<Result<Vec<_>>>()?;

    Ok(Self { extensions, excludes })
  }

  /// Collects the deduplicated, sorted list of files under `roots`.
  ///
  /// # Errors
  ///
  /// Returns an error if a root does not exist.
  pub fn collect(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let start_time = std::time::Instant::now();
    // Keyed by absolute path so overlapping roots yield each file once.
    let mut files = BTreeMap::new();

    for root in roots {
      if !root.exists() {
        bail!("Path does not exist: {}", root.display());
      }

      if root.is_file() {
        self.consider(root.clone(), &mut files)?;
        continue;
      }

      debug!("Scanning directory: {}", root.display());
      let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !self.is_excluded_quiet(entry.path()));

      for entry in walker {
        let entry = match entry {
          Ok(entry) => entry,
          Err(e) => {
            warn!("Error reading directory entry: {}", e);
            continue;
          }
        };
        if entry.file_type().is_file() {
          self.consider(entry.into_path(), &mut files)?;
        }
      }
    }

    debug!(
      "Found {} files in {}ms",
      files.len(),
      start_time.elapsed().as_millis()
    );

    Ok(files.into_values().collect())
  }

  fn consider(&self, path: PathBuf, files: &mut BTreeMap<PathBuf, PathBuf>) -> Result<()> {
    if !self.has_known_extension(&path) {
      trace!("Skipping: {} (no comment style for extension)", path.display());
      return Ok(());
    }
    let absolute = absolutize_path(&path)?;
    if self.is_excluded(&absolute) {
      trace!("Skipping: {} (excluded)", path.display());
      return Ok(());
    }
    files.entry(absolute).or_insert(path);
    Ok(())
  }

  /// Whether the file's extension has a comment style.
  pub fn has_known_extension(&self, path: &Path) -> bool {
    path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
  }

  /// Whether an absolute, normalized path is at or below an excluded path.
  pub fn is_excluded(&self, absolute: &Path) -> bool {
    self.excludes.iter().any(|excluded| absolute.starts_with(excluded))
  }

  fn is_excluded_quiet(&self, path: &Path) -> bool {
    absolutize_path(path).is_ok_and(|absolute| self.is_excluded(&absolute))
  }
}

/// Makes a path absolute against the current directory and removes `.` and
/// `..` components without touching the filesystem.
pub fn absolutize_path(path: &Path) -> Result<PathBuf> {
  let absolute = std::path::absolute(path).with_context(|| format!("Failed to resolve path: {}", path.display()))?;

  let mut normalized = PathBuf::new();
  for component in absolute.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        normalized.pop();
      }
      other => normalized.push(other.as_os_str()),
    }
  }
  Ok(normalized)
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, "").expect("create file");
  }

  #[test]
  fn test_collects_known_extensions_recursively() {
    let dir = tempdir().expect("create temp dir");
    touch(&dir.path().join("a.py"));
    touch(&dir.path().join("nested/deeper/b.c"));
    touch(&dir.path().join("nested/readme.md"));

    let collector = FileCollector::new(["py", "c"], &[]).expect("collector");
    let files = collector.collect(&[dir.path().to_path_buf()]).expect("collect");

    assert_eq!(
      files,
      vec![dir.path().join("a.py"), dir.path().join("nested/deeper/b.c")]
    );
  }

  #[test]
  fn test_excluded_directory_is_skipped() {
    let dir = tempdir().expect("create temp dir");
    touch(&dir.path().join("good.py"));
    touch(&dir.path().join("bad_files/bad.py"));
    touch(&dir.path().join("bad_files_too.py"));

    let collector = FileCollector::new(["py"], &[dir.path().join("bad_files")]).expect("collector");
    let files = collector.collect(&[dir.path().to_path_buf()]).expect("collect");

    assert_eq!(
      files,
      vec![dir.path().join("bad_files_too.py"), dir.path().join("good.py")]
    );
  }

  #[test]
  fn test_excluded_file() {
    let dir = tempdir().expect("create temp dir");
    touch(&dir.path().join("keep.py"));
    touch(&dir.path().join("skip.py"));

    let collector = FileCollector::new(["py"], &[dir.path().join("skip.py")]).expect("collector");
    let files = collector
      .collect(&[dir.path().to_path_buf(), dir.path().join("skip.py")])
      .expect("collect");

    assert_eq!(files, vec![dir.path().join("keep.py")]);
  }

  #[test]
  fn test_overlapping_roots_are_deduplicated() {
    let dir = tempdir().expect("create temp dir");
    touch(&dir.path().join("src/main.py"));

    let collector = FileCollector::new(["py"], &[]).expect("collector");
    let files = collector
      .collect(&[
        dir.path().to_path_buf(),
        dir.path().join("src"),
        dir.path().join("src/./main.py"),
      ])
      .expect("collect");

    assert_eq!(files.len(), 1);
  }

  #[test]
  fn test_explicit_file_with_unknown_extension_is_skipped() {
    let dir = tempdir().expect("create temp dir");
    touch(&dir.path().join("notes.txt"));

    let collector = FileCollector::new(["py"], &[]).expect("collector");
    let files = collector.collect(&[dir.path().join("notes.txt")]).expect("collect");

    assert!(files.is_empty());
  }

  #[test]
  fn test_missing_root_is_an_error() {
    let dir = tempdir().expect("create temp dir");
    let collector = FileCollector::new(["py"], &[]).expect("collector");

    assert!(collector.collect(&[dir.path().join("nope")]).is_err());
  }

  #[test]
  fn test_extension_match_is_case_insensitive() {
    let collector = FileCollector::new(["py"], &[]).expect("collector");
    assert!(collector.has_known_extension(Path::new("Main.PY")));
    assert!(!collector.has_known_extension(Path::new("Makefile")));
  }

  #[cfg(unix)]
  #[test]
  fn test_absolutize_path_normalizes() {
    let normalized = absolutize_path(Path::new("/a/./b/../c")).expect("absolutize");
    assert_eq!(normalized, PathBuf::from("/a/c"));
  }
}
