//! Config file resolution
//!
//! ## Resolution Order
//!
//! 1. Explicit `--config PATH` flag
//! 2. `./venuesender.json` in the working directory
//! 3. The platform config directory (e.g. `~/.config/venuesender/venuesender.json`)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{VenueError, VenueResult};

/// Config file name used in both the working directory and the config dir
pub const CONFIG_FILE_NAME: &str = "venuesender.json";

/// Resolve the config file path to load
///
/// # Errors
///
/// Returns [`VenueError::Config`] if no candidate file exists.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> VenueResult<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path);
        }
        return Err(VenueError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(local);
    }

    if let Some(dirs) = ProjectDirs::from("", "", "venuesender") {
        let candidate = dirs.config_dir().join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(VenueError::Config(format!(
        "No {} found in the working directory or the user config directory",
        CONFIG_FILE_NAME
    )))
}
