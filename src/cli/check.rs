//! # Check Command
//!
//! This module implements the check/apply command for license headers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::Args;
use head_of_apache::config::{CliOverrides, load_config};
use head_of_apache::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use head_of_apache::output::print_summary;
use head_of_apache::processor::{Reconciler, ReconcilerConfig};
use head_of_apache::verbose_log;
use tracing::debug;

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
  /// Files or directories to process. Directories are searched recursively.
  #[arg(required = true, value_name = "PATHS")]
  pub paths: Vec<PathBuf>,

  /// The author to use in the license header
  #[arg(short, long)]
  pub author: Option<String>,

  /// Overwrite existing or add additional file types to the default
  /// file/comment style mapping (repeatable)
  #[arg(short, long, num_args = 2, value_names = ["EXT", "STYLE"])]
  pub mapping: Vec<String>,

  /// A path to exclude. A file is excluded if it is the given path or lies
  /// below it (repeatable)
  #[arg(short = 'x', long, value_name = "PATH")]
  pub exclude: Vec<PathBuf>,

  /// Notify about missing license headers, but do not apply them
  #[arg(short, long)]
  pub dry_run: bool,

  /// End the copyright year range with 'present' instead of the current year
  #[arg(long)]
  pub last_year_present: bool,

  /// Year to treat as the current year (defaults to the current UTC year)
  #[arg(long, value_name = "YEAR")]
  pub year: Option<i32>,

  /// Path to config file (default: .head-of-apache.toml in the current
  /// directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Run the check command with the given arguments.
///
/// Returns exit code 0 if every file already carried a current header and 1
/// otherwise, in dry runs as well as real runs.
pub fn run_check(args: CheckArgs) -> Result<ExitCode> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let current_dir = std::env::current_dir().context("Failed to get current directory")?;
  let mut config = load_config(args.config.as_deref(), &current_dir, args.no_config)?.unwrap_or_default();

  let overrides = CliOverrides::from_cli_args(&args.mapping)?;
  config.merge_cli_overrides(overrides);

  let Some(author) = args.author.or_else(|| config.author.clone()) else {
    bail!("Missing required argument: --author <AUTHOR>");
  };

  let registry = config.build_registry()?;
  let current_year = args.year.unwrap_or_else(|| chrono::Utc::now().year());
  let last_year_present = args.last_year_present || config.last_year_present;

  let mut excludes = args.exclude;
  excludes.extend(config.exclude.iter().cloned());

  debug!(
    "Author: {}, year: {}, last year present: {}, dry run: {}",
    author, current_year, last_year_present, args.dry_run
  );

  let reconciler = Reconciler::new(ReconcilerConfig {
    dry_run: args.dry_run,
    last_year_present,
    ..ReconcilerConfig::new(registry, author, current_year)
  });

  let summary = reconciler.process(&args.paths, &excludes)?;
  if summary.total_files == 0 {
    verbose_log!("No files with a known comment style were found");
  }

  print_summary(&summary, args.dry_run);

  Ok(ExitCode::from(summary.exit_code()))
}
