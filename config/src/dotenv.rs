//! Read a project `.env` file into a key-value map without touching the process environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// `.env` in `override_dir`, or in the current directory.
fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Parses `.env` with the `dotenv` crate. A missing file is an empty map.
///
/// Unlike `dotenv::dotenv()`, nothing is written to the environment here; `load_and_apply`
/// decides which values win.
pub fn load_env_map(override_dir: Option<&Path>) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = dotenv_path(override_dir) else {
        return Ok(HashMap::new());
    };
    let iter = dotenv::from_path_iter(&path).map_err(|e| LoadError::Dotenv {
        path: path.clone(),
        message: e.to_string(),
    })?;
    iter.map(|item| {
        item.map_err(|e| LoadError::Dotenv {
            path: path.clone(),
            message: e.to_string(),
        })
    })
    .collect()
}
