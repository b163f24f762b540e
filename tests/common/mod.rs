#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use head_of_apache::config::CONFIG_ENV_VAR;
use head_of_apache::templates::{StyleRegistry, render, to_text};

/// Author used by every fixture.
pub const AUTHOR: &str = "Jane Doe";

/// Year passed via `--year` so results do not depend on the clock.
pub const YEAR: i32 = 2025;

/// Writes `content` to `dir/name`, creating parent directories as needed.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
  let path = dir.join(name);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// Renders the header text for `author` and `year` in the built-in style of
/// `extension`.
pub fn header_for(extension: &str, author: &str, year: &str) -> String {
  let registry = StyleRegistry::builtin();
  let style = registry.style_for(extension).expect("built-in extension");
  to_text(&render(author, year, style), "\n")
}

/// A command for the binary running in `dir`, isolated from any config in
/// the environment and with colors disabled.
pub fn head_of_apache(dir: &Path) -> Command {
  let mut cmd = Command::cargo_bin("head-of-apache").expect("binary is built");
  cmd
    .current_dir(dir)
    .env_remove(CONFIG_ENV_VAR)
    .env_remove("RUST_LOG")
    .arg("--colors=never");
  cmd
}

/// Like [`head_of_apache`], with `--author` and `--year` already set.
pub fn head_of_apache_for_author(dir: &Path) -> Command {
  let mut cmd = head_of_apache(dir);
  cmd.args(["--author", AUTHOR]).arg("--year").arg(YEAR.to_string());
  cmd
}
