//! Path utilities for vidgrab data and download directories.
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately
//! - Environment overrides take priority over platform defaults

mod ensure;
mod error;

use std::env;
use std::path::PathBuf;

pub use ensure::ensure_directory;
pub use error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "VIDGRAB_DATA_DIR";

/// Environment variable overriding the downloads directory.
pub const DOWNLOADS_DIR_ENV: &str = "VIDGRAB_DOWNLOADS_DIR";

/// Downloads directory relative to the working directory when not overridden.
pub const DEFAULT_DOWNLOADS_DIR_RELATIVE: &str = "public/downloads";

/// Get the root directory for application data.
///
/// Resolution order:
/// 1. `VIDGRAB_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/vidgrab`)
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("vidgrab"))
}

/// Get the directory downloaded files are written to and served from.
///
/// Resolution order:
/// 1. `VIDGRAB_DOWNLOADS_DIR` environment variable
/// 2. `public/downloads` under the current working directory
pub fn default_downloads_dir() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(DOWNLOADS_DIR_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    env::current_dir()
        .map(|cwd| cwd.join(DEFAULT_DOWNLOADS_DIR_RELATIVE))
        .map_err(|e| PathError::CurrentDirError(e.to_string()))
}
