//! # head-of-apache
//!
//! A tool that ensures source code files carry an Apache 2.0 license header.

mod cli;

use std::process::ExitCode;

use head_of_apache::output::print_error;

use crate::cli::{Cli, run_check};

fn main() -> ExitCode {
  let cli = Cli::parse_args();

  match run_check(cli.check_args) {
    Ok(code) => code,
    Err(e) => {
      print_error(&format!("ERROR: {e:#}"));
      ExitCode::from(2)
    }
  }
}
