//! Subcommand implementations for the `logsec` binary.
//!
//! Each `run` returns `Ok(true)` when the command succeeded cleanly and
//! `Ok(false)` when it completed but should exit non-zero (a sensitive key,
//! a finding in a scan).

pub mod check_key;
pub mod init;
pub mod sanitize;
pub mod scan;
pub mod write;

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::Result;

/// Load `--config` when given, otherwise the project config under the
/// current directory (defaults if absent).
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    match config {
        Some(path) => Settings::load_from(path),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Settings::load_project(&cwd)
        }
    }
}
