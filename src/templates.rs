//! # Templates Module
//!
//! This module owns the Apache 2.0 license notice and everything needed to
//! render it for a particular file:
//! - [`CommentStyle`] describes how a comment block is opened, continued and
//!   closed
//! - [`StyleRegistry`] maps style names and file extensions to comment styles
//! - [`YearExpr`] is the year (or year range) stamped into the notice
//! - [`render`] produces the expected header as a list of trimmed lines
//!
//! ## Example
//!
//! ```rust
//! use head_of_apache::templates::{StyleRegistry, YearExpr, render};
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = StyleRegistry::builtin();
//! let style = registry.style_for("py")?;
//!
//! let header = render("Jane Doe", &YearExpr::Range(2020, 2025).to_string(), style);
//! assert_eq!(header[0], "#   Copyright 2020 - 2025 Jane Doe");
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::config::CommentStyleConfig;
use crate::verbose_log;

/// Number of lines in a rendered license header, independent of the style.
pub const LICENSE_LENGTH: usize = 13;

const LICENSE_TEXT: &str = r#"Copyright {{year}} {{author}}

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License."#;

/// Defines how a license comment block is written for a file type.
///
/// # Fields
///
/// * `open` - Prefix of the first line of the block (e.g. "/* ")
/// * `middle` - Prefix of every following line (e.g. " * ")
/// * `close` - Suffix appended to the last line (e.g. " */")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
  /// Prefix of the first line of the comment block
  pub open: String,

  /// Prefix of every continuation line
  pub middle: String,

  /// Suffix of the last line of the comment block
  pub close: String,
}

impl CommentStyle {
  /// Create a comment style from its three markers.
  pub fn new(open: &str, middle: &str, close: &str) -> Self {
    Self {
      open: open.to_string(),
      middle: middle.to_string(),
      close: close.to_string(),
    }
  }
}

impl From<&CommentStyleConfig> for CommentStyle {
  fn from(config: &CommentStyleConfig) -> Self {
    Self {
      open: config.open.clone(),
      middle: config.middle.clone(),
      close: config.close.clone(),
    }
  }
}

/// Errors raised by [`StyleRegistry`] lookups and updates.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
  /// No comment style is mapped to the extension.
  #[error("No comment style is mapped to the extension '{0}'")]
  UnknownExtension(String),

  /// An extension was mapped to a style name that is not defined.
  #[error("Extension '{extension}' is mapped to unknown comment style '{style}'")]
  UnknownStyle { extension: String, style: String },
}

/// Immutable lookup tables from style names and file extensions to comment
/// styles.
///
/// Built with [`StyleRegistry::builtin`] and then extended with caller
/// supplied styles and extension mappings; later mappings win.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
  styles: BTreeMap<String, CommentStyle>,
  extensions: BTreeMap<String, String>,
}

impl Default for StyleRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}

impl StyleRegistry {
  /// Creates a registry with no styles and no extensions.
  pub const fn empty() -> Self {
    Self {
      styles: BTreeMap::new(),
      extensions: BTreeMap::new(),
    }
  }

  /// Creates a registry holding the built-in styles and extension mapping.
  ///
  /// | style      | extensions                          |
  /// |------------|-------------------------------------|
  /// | `asterisk` | c, cpp, css, h, hpp, js, scss       |
  /// | `hash`     | py, sh                              |
  /// | `html`     | html, vue                           |
  /// | `jinja`    | j2                                  |
  pub fn builtin() -> Self {
    let mut registry = Self::empty();
    registry.add_style("asterisk", CommentStyle::new("/* ", " * ", " */"));
    registry.add_style("hash", CommentStyle::new("#   ", "#   ", ""));
    registry.add_style("html", CommentStyle::new("<!-- ", "   - ", " -->"));
    registry.add_style("jinja", CommentStyle::new("{# ", " # ", " #}"));

    let mapping = [
      ("c", "asterisk"),
      ("cpp", "asterisk"),
      ("css", "asterisk"),
      ("h", "asterisk"),
      ("hpp", "asterisk"),
      ("html", "html"),
      ("j2", "jinja"),
      ("js", "asterisk"),
      ("py", "hash"),
      ("scss", "asterisk"),
      ("sh", "hash"),
      ("vue", "html"),
    ];
    for (extension, style) in mapping {
      registry
        .extensions
        .insert(extension.to_string(), style.to_string());
    }

    registry
  }

  /// Defines (or redefines) a named comment style.
  pub fn add_style(&mut self, name: &str, style: CommentStyle) {
    self.styles.insert(name.to_lowercase(), style);
  }

  /// Maps an extension (without the leading dot) to a named style.
  ///
  /// # Errors
  ///
  /// Returns [`StyleError::UnknownStyle`] if `style` has not been defined.
  pub fn map_extension(&mut self, extension: &str, style: &str) -> Result<(), StyleError> {
    let extension = normalize_extension(extension);
    let style = style.to_lowercase();
    if !self.styles.contains_key(&style) {
      return Err(StyleError::UnknownStyle { extension, style });
    }

    verbose_log!("Mapping .{} files to the '{}' comment style", extension, style);
    self.extensions.insert(extension, style);
    Ok(())
  }

  /// Looks up the comment style for an extension.
  ///
  /// # Errors
  ///
  /// Returns [`StyleError::UnknownExtension`] if nothing is mapped to it.
  pub fn style_for(&self, extension: &str) -> Result<&CommentStyle, StyleError> {
    let extension = normalize_extension(extension);
    self
      .extensions
      .get(&extension)
      .and_then(|name| self.styles.get(name))
      .ok_or(StyleError::UnknownExtension(extension))
  }

  /// Looks up the comment style for a file based on its extension.
  pub fn style_for_path(&self, path: &Path) -> Result<&CommentStyle, StyleError> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    self.style_for(extension)
  }

  /// The known extensions, sorted.
  pub fn extensions(&self) -> impl Iterator<Item = &str> {
    self.extensions.keys().map(String::as_str)
  }
}

fn normalize_extension(extension: &str) -> String {
  extension.trim_start_matches('.').to_lowercase()
}

/// The year part of a copyright notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearExpr {
  /// `2025`
  Single(i32),
  /// `2020 - 2025`
  Range(i32, i32),
  /// `2020 - present`
  OpenRange(i32),
}

impl YearExpr {
  /// Resolves the year expression a header should carry.
  ///
  /// An open range is used whenever `present` is requested; otherwise the
  /// range ends at `current_year`, collapsing to a single year when the
  /// notice does not start before the current year.
  pub const fn resolve(start_year: i32, current_year: i32, present: bool) -> Self {
    if present {
      Self::OpenRange(start_year)
    } else if start_year < current_year {
      Self::Range(start_year, current_year)
    } else {
      Self::Single(start_year)
    }
  }
}

impl fmt::Display for YearExpr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Single(year) => write!(f, "{year}"),
      Self::Range(start, end) => write!(f, "{start} - {end}"),
      Self::OpenRange(start) => write!(f, "{start} - present"),
    }
  }
}

/// Renders the license header for `author` and `year` in the given comment
/// style.
///
/// The result always has [`LICENSE_LENGTH`] lines, each with trailing
/// whitespace removed. The first line is prefixed with `style.open`, the
/// others with `style.middle`, and `style.close` is appended to the last one.
pub fn render(author: &str, year: &str, style: &CommentStyle) -> Vec<String> {
  let text = LICENSE_TEXT
    .replace("{{year}}", year)
    .replace("{{author}}", author);
  let last = LICENSE_LENGTH - 1;

  text
    .lines()
    .enumerate()
    .map(|(index, line)| {
      let prefix = if index == 0 { &style.open } else { &style.middle };
      let mut rendered = format!("{prefix}{line}");
      if index == last {
        rendered.push_str(&style.close);
      }
      rendered.trim_end().to_string()
    })
    .collect()
}

/// Joins rendered header lines into file content, terminating every line
/// with `line_ending`.
pub fn to_text(lines: &[String], line_ending: &str) -> String {
  let mut text = String::with_capacity(lines.iter().map(|line| line.len() + line_ending.len()).sum());
  for line in lines {
    text.push_str(line);
    text.push_str(line_ending);
  }
  text
}
