//! # bridge-cli
//!
//! Command-line interface for the zone configuration loader.
//!
//! ## Commands
//!
//! - `bridge show` — Print the merged configuration (secrets redacted)
//! - `bridge validate` — Validate one zone or all of them
//! - `bridge init` — Write a starting-point environment file
//! - `bridge tags` — Print the standard resource tags
//! - `bridge env` — List environment overrides and whether they are set

pub mod commands;

pub use commands::Cli;
