//! Startup configuration for synth.
//!
//! Values come from three places and are applied to the process environment with priority
//! **existing env > project `.env` > `$XDG_CONFIG_HOME/<app>/config.toml`**. The research
//! runner then reads everything from the environment (`ResearchBuildConfig::from_env`).

mod dotenv;
mod xdg_toml;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use xdg_toml::{config_home, ConfigFile, ResearchSection};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("no config directory for this platform; set XDG_CONFIG_HOME")]
    NoConfigDir,
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("parse {}: {message}", path.display())]
    Dotenv { path: PathBuf, message: String },
}

/// Merged view: `.env` entries over config-file entries. Does not look at the process env.
pub fn collect_env(
    config_home: &Path,
    app_name: &str,
    dotenv_dir: Option<&Path>,
) -> Result<HashMap<String, String>, LoadError> {
    let mut merged = xdg_toml::load_file(config_home, app_name)?
        .map(ConfigFile::into_env_map)
        .unwrap_or_default();
    merged.extend(dotenv::load_env_map(dotenv_dir)?);
    Ok(merged)
}

/// Sets each variable that is not already present in the environment. Returns the keys set.
pub fn apply_missing(values: HashMap<String, String>) -> Vec<String> {
    let mut applied: Vec<String> = values
        .into_iter()
        .filter(|(key, _)| std::env::var_os(key).is_none())
        .map(|(key, value)| {
            std::env::set_var(&key, value);
            key
        })
        .collect();
    applied.sort();
    applied
}

/// Loads `.env` (from `override_dir` or the current directory) and the app's `config.toml`,
/// then sets only the variables missing from the environment.
///
/// * `app_name`: e.g. `"synth"`; the config file is `~/.config/synth/config.toml`.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    load_and_apply_from(&config_home()?, app_name, override_dir).map(|_| ())
}

/// `load_and_apply` with an explicit config home. Returns the keys that were set.
pub fn load_and_apply_from(
    config_home: &Path,
    app_name: &str,
    override_dir: Option<&Path>,
) -> Result<Vec<String>, LoadError> {
    collect_env(config_home, app_name, override_dir).map(apply_missing)
}
