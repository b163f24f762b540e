//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing.

mod check;

pub use check::{CheckArgs, run_check};
use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Check for Apache 2.0 license headers in one or multiple files.
///
/// The given paths can be single files and/or directories that are searched
/// recursively for file types with a known comment style.
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  long_about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Report files with a missing or outdated header
  head-of-apache --dry-run --author \"Jane Doe\" src/

  # Add or update headers, ending year ranges with 'present'
  head-of-apache --author \"Jane Doe\" --last-year-present src/ scripts/run.sh

  # Treat Go files like C files and skip a vendored directory
  head-of-apache --author \"Jane Doe\" --mapping go asterisk --exclude src/vendor src/
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(flatten)]
  pub check_args: CheckArgs,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_parse_full_command_line() {
    let cli = Cli::try_parse_from([
      "head-of-apache",
      "--author",
      "Jane Doe",
      "--mapping",
      "go",
      "asterisk",
      "-m",
      "vue",
      "hash",
      "--exclude",
      "src/vendor",
      "-x",
      "build",
      "--dry-run",
      "--last-year-present",
      "src",
      "main.py",
    ])
    .expect("valid command line");

    let args = cli.check_args;
    assert_eq!(args.author.as_deref(), Some("Jane Doe"));
    assert_eq!(args.mapping, vec!["go", "asterisk", "vue", "hash"]);
    assert_eq!(args.exclude.len(), 2);
    assert!(args.dry_run);
    assert!(args.last_year_present);
    assert_eq!(args.paths.len(), 2);
  }

  #[test]
  fn test_paths_are_required() {
    assert!(Cli::try_parse_from(["head-of-apache", "--author", "Jane Doe"]).is_err());
  }

  #[test]
  fn test_mapping_needs_two_values() {
    assert!(Cli::try_parse_from(["head-of-apache", "--author", "Jane", "--mapping", "go"]).is_err());
  }
}
