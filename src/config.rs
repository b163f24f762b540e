//! # Configuration Module
//!
//! This module provides configuration support for head-of-apache. A
//! `.head-of-apache.toml` file (or the file named by the
//! `HEAD_OF_APACHE_CONFIG` environment variable) can set the author, define
//! extra comment styles and map extensions to styles:
//!
//! ```toml
//! author = "Jane Doe"
//! last-year-present = true
//! exclude = ["vendor"]
//!
//! [comment-styles]
//! dash = { open = "-- ", middle = "-- " }
//!
//! [mapping]
//! go = "asterisk"
//! sql = "dash"
//! ```
//!
//! Command-line options take precedence over the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::templates::{CommentStyle, StyleError, StyleRegistry};
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".head-of-apache.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "HEAD_OF_APACHE_CONFIG";

/// User-defined comment style.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CommentStyleConfig {
  /// Prefix of the first header line (e.g. "/* "). Defaults to empty.
  #[serde(default)]
  pub open: String,

  /// Prefix of every following header line (e.g. " * ").
  pub middle: String,

  /// Suffix of the last header line (e.g. " */"). Defaults to empty.
  #[serde(default)]
  pub close: String,
}

/// Main configuration struct, loaded from the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  /// Author to attribute the license to.
  #[serde(default)]
  pub author: Option<String>,

  /// End year ranges with `present`.
  #[serde(default)]
  pub last_year_present: bool,

  /// Paths to exclude, relative to the current directory.
  #[serde(default)]
  pub exclude: Vec<PathBuf>,

  /// Additional comment styles, keyed by style name.
  #[serde(default)]
  pub comment_styles: HashMap<String, CommentStyleConfig>,

  /// Extension to style name mapping, merged over the built-in mapping.
  #[serde(default)]
  pub mapping: HashMap<String, String>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A comment style definition is invalid.
  #[error("Invalid comment style '{name}': {message}")]
  InvalidCommentStyle { name: String, message: String },

  /// An extension mapping is invalid.
  #[error("Invalid mapping for '{extension}': {message}")]
  InvalidMapping { extension: String, message: String },

  /// A `--mapping` argument list had a dangling extension.
  #[error("Mapping '{0}' is missing a comment style")]
  IncompleteMapping(String),
}

impl Config {
  /// Load configuration from a file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;
    let config = config.normalize();

    verbose_log!(
      "Loaded {} comment styles and {} extension mappings",
      config.comment_styles.len(),
      config.mapping.len()
    );

    Ok(config)
  }

  fn parse(content: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(content)
  }

  /// Checks that style definitions have a `middle` prefix and that no
  /// extension includes the leading dot.
  fn validate(&self) -> Result<(), ConfigError> {
    for (name, style) in &self.comment_styles {
      if style.middle.is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          name: name.clone(),
          message: "middle field cannot be empty".to_string(),
        });
      }
    }

    for extension in self.mapping.keys() {
      if extension.starts_with('.') {
        return Err(ConfigError::InvalidMapping {
          extension: extension.clone(),
          message: "extension should not include leading dot".to_string(),
        });
      }
    }

    Ok(())
  }

  /// Lowercases style names and extensions for case-insensitive lookups.
  fn normalize(self) -> Self {
    let comment_styles = self
      .comment_styles
      .into_iter()
      .map(|(k, v)| (k.to_lowercase(), v))
      .collect();
    let mapping = self
      .mapping
      .into_iter()
      .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
      .collect();

    Self {
      comment_styles,
      mapping,
      ..self
    }
  }

  /// Merges command-line overrides into this configuration.
  pub fn merge_cli_overrides(&mut self, overrides: CliOverrides) {
    for (extension, style) in overrides.mappings {
      self.mapping.insert(extension, style);
    }
  }

  /// Builds the style registry: built-in styles and mapping, then this
  /// configuration's styles, then its mapping.
  ///
  /// # Errors
  ///
  /// Returns [`StyleError::UnknownStyle`] if an extension is mapped to a
  /// style that is neither built in nor defined here.
  pub fn build_registry(&self) -> Result<StyleRegistry, StyleError> {
    let mut registry = StyleRegistry::builtin();
    for (name, style) in &self.comment_styles {
      registry.add_style(name, CommentStyle::from(style));
    }

    // Sorted so errors are deterministic.
    let mut mapping: Vec<_> = self.mapping.iter().collect();
    mapping.sort();
    for (extension, style) in mapping {
      registry.map_extension(extension, style)?;
    }

    Ok(registry)
  }
}

/// Extension mappings given on the command line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliOverrides {
  /// `(extension, style)` pairs in the order given
  pub mappings: Vec<(String, String)>,
}

impl CliOverrides {
  /// Builds overrides from the flattened `--mapping EXT STYLE` values.
  pub fn from_cli_args(values: &[String]) -> Result<Self, ConfigError> {
    let mut mappings = Vec::with_capacity(values.len() / 2);
    let mut chunks = values.chunks_exact(2);
    for pair in &mut chunks {
      let extension = pair[0].trim_start_matches('.').to_lowercase();
      mappings.push((extension, pair[1].to_lowercase()));
    }
    if let [dangling] = chunks.remainder() {
      return Err(ConfigError::IncompleteMapping(dangling.clone()));
    }

    Ok(Self { mappings })
  }
}

/// Finds the configuration file to use, if any.
///
/// Candidates are tried in order:
/// 1. `explicit_path` (from `--config`); if given, nothing else is tried
/// 2. the path in the `HEAD_OF_APACHE_CONFIG` environment variable
/// 3. `.head-of-apache.toml` in `search_dir`
///
/// The first candidate that exists wins.
pub fn discover_config_path(explicit_path: Option<&Path>, search_dir: &Path) -> Option<PathBuf> {
  let candidates: Vec<(&str, PathBuf)> = match explicit_path {
    Some(path) => vec![("--config", path.to_path_buf())],
    None => std::env::var_os(CONFIG_ENV_VAR)
      .map(|value| (CONFIG_ENV_VAR, PathBuf::from(value)))
      .into_iter()
      .chain(std::iter::once(("search directory", search_dir.join(DEFAULT_CONFIG_FILENAME))))
      .collect(),
  };

  for (source, path) in candidates {
    if path.is_file() {
      verbose_log!("Using config file {} (from {})", path.display(), source);
      return Some(path);
    }
    verbose_log!("No config file at {} (from {})", path.display(), source);
  }

  None
}

/// Loads the configuration selected by [`discover_config_path`].
///
/// Returns `Ok(None)` when `no_config` is set or there is no config file. A
/// `--config` path that does not exist is an error.
pub fn load_config(explicit_path: Option<&Path>, search_dir: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Skipping config file discovery (--no-config)");
    return Ok(None);
  }

  if let Some(path) = explicit_path
    && !path.is_file()
  {
    bail!("Config file not found: {}", path.display());
  }

  discover_config_path(explicit_path, search_dir)
    .map(|path| Config::load(&path).with_context(|| format!("Invalid config file {}", path.display())))
    .transpose()
}
