//! OS-specific directories for simulator data and configuration.

use std::path::PathBuf;

use crate::constants::APP_DIR_NAME;
use crate::error::{PsError, PsResult};

/// Where the database, notes and logs live.
///
/// - Windows: `%APPDATA%/PhoneSimulator`
/// - macOS: `~/Library/Application Support/PhoneSimulator`
/// - Linux: `~/.local/share/PhoneSimulator`
pub fn data_dir() -> PsResult<PathBuf> {
    app_dir(dirs::data_dir(), "data")
}

/// Where `config.toml` lives. On Linux this is `~/.config/PhoneSimulator`.
pub fn config_dir() -> PsResult<PathBuf> {
    app_dir(dirs::config_dir(), "config")
}

fn app_dir(base: Option<PathBuf>, kind: &str) -> PsResult<PathBuf> {
    base.map(|b| b.join(APP_DIR_NAME))
        .ok_or_else(|| PsError::Config(format!("could not determine {kind} directory")))
}
