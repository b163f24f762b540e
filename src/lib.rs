//! # head-of-apache
//!
//! A tool that makes sure source files start with an Apache 2.0 license header
//! attributed to a given author.
//!
//! Each file's leading comment block is read (keeping shebang and encoding
//! lines above it), compared with the expected header using approximate line
//! matching, and classified as current, outdated or missing. Outdated headers
//! are regenerated with an updated year range and missing headers are
//! inserted; a header by a different author is kept below the new one.
//! Files are rewritten atomically through a temporary file.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use head_of_apache::processor::{Reconciler, ReconcilerConfig};
//! use head_of_apache::templates::StyleRegistry;
//!
//! fn main() -> anyhow::Result<()> {
//!   let config = ReconcilerConfig {
//!     dry_run: true,
//!     ..ReconcilerConfig::new(StyleRegistry::builtin(), "Jane Doe", 2025)
//!   };
//!   let reconciler = Reconciler::new(config);
//!
//!   let summary = reconciler.process(&[PathBuf::from("src")], &[])?;
//!   if summary.exit_code() != 0 {
//!     println!("Some files need a license header");
//!   }
//!
//!   Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - Header reading, reconciliation and file rewriting
//! * [`license_detection`] - Notice parsing and header classification
//! * [`templates`] - Comment styles and license rendering
//! * [`config`] - Configuration file support
//! * [`logging`] - Logging utilities for verbose output

pub mod config;
pub mod license_detection;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod templates;
