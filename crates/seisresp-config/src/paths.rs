//! Platform-specific configuration paths.
//!
//! - Linux: `~/.config/seisresp/`
//! - macOS: `~/Library/Application Support/seisresp/`
//! - Windows: `%APPDATA%\seisresp\`
//!
//! The user instrument table is `instruments.toml` inside that directory.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::table::InstrumentTable;

/// Application name used for directory paths.
const APP_NAME: &str = "seisresp";

/// File name of the user instrument table.
const INSTRUMENT_TABLE_FILE: &str = "instruments.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform config directory
/// cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the user instrument table.
pub fn user_instrument_table_path() -> PathBuf {
    user_config_dir().join(INSTRUMENT_TABLE_FILE)
}

/// Ensure the user config directory exists.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// The factory table with the table at `path` merged over it, if the file
/// exists.
pub fn load_merged(path: &Path) -> Result<InstrumentTable, ConfigError> {
    let mut table = InstrumentTable::factory();
    if path.is_file() {
        table.merge(InstrumentTable::load(path)?);
    } else {
        tracing::debug!(path = %path.display(), "no user instrument table, using factory table");
    }
    Ok(table)
}

/// The factory table with the user instrument table merged over it.
///
/// A missing user table is not an error; a malformed one is.
pub fn load_user_or_factory() -> Result<InstrumentTable, ConfigError> {
    load_merged(&user_instrument_table_path())
}
