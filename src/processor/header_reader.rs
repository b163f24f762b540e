//! # Header Reader Module
//!
//! Reads the leading lines of a file that may hold a license header. Preamble
//! lines that must stay at the very top of a file (shebangs and encoding
//! declarations) are collected separately so the header can be inserted below
//! them.

use std::io::BufRead;

use anyhow::{Context, Result};

use crate::templates::CommentStyle;

/// Kinds of preamble lines that precede a license header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreambleKind {
  /// `#!/usr/bin/env python3`
  Shebang,
  /// `# -*- coding: utf-8 -*-`
  Encoding,
}

impl PreambleKind {
  /// Every preamble kind, in the order they are checked.
  pub const ALL: [Self; 2] = [Self::Shebang, Self::Encoding];

  /// The prefix that identifies a line of this kind.
  pub const fn marker(self) -> &'static str {
    match self {
      Self::Shebang => "#!",
      Self::Encoding => "# -*- coding:",
    }
  }
}

/// The leading lines of a file, split into preamble and header candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeaderSnapshot {
  /// Preamble lines in the order they appear in the file.
  pub preamble: Vec<(PreambleKind, String)>,
  /// The first line after the preamble.
  pub first_line: String,
  /// Up to `n - 1` lines following `first_line`, with blank lines replaced by
  /// the style's continuation prefix.
  pub header_lines: Vec<String>,
}

impl FileHeaderSnapshot {
  /// Whether a preamble line of the given kind was captured.
  pub fn has_preamble(&self, kind: PreambleKind) -> bool {
    self.preamble.iter().any(|(captured, _)| *captured == kind)
  }

  /// The header candidate: `first_line` followed by `header_lines`.
  pub fn header(&self) -> impl Iterator<Item = &str> {
    std::iter::once(self.first_line.as_str()).chain(self.header_lines.iter().map(String::as_str))
  }
}

/// Reads the preamble and the first `n_lines` lines of header candidate.
///
/// Shebang and encoding lines are recognized in either order, each at most
/// once. Scanning stops at the first line that matches no uncaptured
/// preamble kind; that line becomes `first_line`. Reading never goes past the
/// end of the input, so short files produce a short snapshot.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not valid UTF-8.
pub fn read_header<R: BufRead>(reader: R, style: &CommentStyle, n_lines: usize) -> Result<FileHeaderSnapshot> {
  let mut lines = LineReader::new(reader);
  let mut snapshot = FileHeaderSnapshot::default();

  let mut current = lines.next_line()?;
  loop {
    let mut matched = false;
    for kind in PreambleKind::ALL {
      if snapshot.has_preamble(kind) {
        continue;
      }
      if let Some(line) = current.as_deref()
        && line.starts_with(kind.marker())
      {
        snapshot.preamble.push((kind, line.to_string()));
        current = lines.next_line()?;
        matched = true;
      }
    }
    if !matched {
      break;
    }
  }

  let Some(first_line) = current else {
    return Ok(snapshot);
  };
  snapshot.first_line = first_line;

  while snapshot.header_lines.len() + 1 < n_lines {
    let Some(line) = lines.next_line()? else {
      break;
    };
    if line.trim_end().is_empty() {
      snapshot.header_lines.push(style.middle.clone());
    } else {
      snapshot.header_lines.push(line);
    }
  }

  Ok(snapshot)
}

/// Line iterator that strips `\n` / `\r\n` terminators and stops at EOF.
struct LineReader<R> {
  reader: R,
  line_number: usize,
}

impl<R: BufRead> LineReader<R> {
  const fn new(reader: R) -> Self {
    Self { reader, line_number: 0 }
  }

  fn next_line(&mut self) -> Result<Option<String>> {
    let mut buf = String::new();
    self.line_number += 1;
    let read = self
      .reader
      .read_line(&mut buf)
      .with_context(|| format!("Failed to read line {}", self.line_number))?;
    if read == 0 {
      return Ok(None);
    }

    if buf.ends_with('\n') {
      buf.pop();
      if buf.ends_with('\r') {
        buf.pop();
      }
    }
    Ok(Some(buf))
  }
}
