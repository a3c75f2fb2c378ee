//! `$XDG_CONFIG_HOME/<app>/config.toml`: an `[env]` table of raw variables plus a typed
//! `[research]` table that maps onto the `SYNTH_*` / `OPENAI_MODEL` / `PYTHON_BIN` variables.
//!
//! ```toml
//! [env]
//! OPENAI_API_KEY = "sk-..."
//!
//! [research]
//! model = "gpt-4.1"
//! max_turns = 20
//! db_path = "/home/me/.local/share/synth/sessions.db"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::LoadError;

/// Base config directory: `$XDG_CONFIG_HOME` when set, else the platform default.
pub fn config_home() -> Result<PathBuf, LoadError> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir().ok_or(LoadError::NoConfigDir)
}

/// Typed research settings. Every field is optional; unset fields add nothing.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResearchSection {
    pub model: Option<String>,
    pub openai_base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_turns: Option<usize>,
    pub db_path: Option<PathBuf>,
    pub python_bin: Option<String>,
    pub python_timeout_secs: Option<u64>,
}

impl ResearchSection {
    /// Environment variables this section stands for.
    pub fn to_env(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(v) = &self.model {
            out.push(("OPENAI_MODEL", v.clone()));
        }
        if let Some(v) = &self.openai_base_url {
            out.push(("OPENAI_BASE_URL", v.clone()));
        }
        if let Some(v) = self.temperature {
            out.push(("SYNTH_TEMPERATURE", v.to_string()));
        }
        if let Some(v) = self.max_turns {
            out.push(("SYNTH_MAX_TURNS", v.to_string()));
        }
        if let Some(v) = &self.db_path {
            out.push(("SYNTH_DB", v.display().to_string()));
        }
        if let Some(v) = &self.python_bin {
            out.push(("PYTHON_BIN", v.clone()));
        }
        if let Some(v) = self.python_timeout_secs {
            out.push(("SYNTH_PYTHON_TIMEOUT_SECS", v.to_string()));
        }
        out
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub research: ResearchSection,
}

impl ConfigFile {
    /// Flattened variables. An explicit `[env]` entry beats the `[research]` mapping.
    pub fn into_env_map(self) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = self
            .research
            .to_env()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        map.extend(self.env);
        map
    }
}

/// Reads `<config_home>/<app_name>/config.toml`. A missing file is `Ok(None)`.
pub fn load_file(config_home: &Path, app_name: &str) -> Result<Option<ConfigFile>, LoadError> {
    let path = config_home.join(app_name).join("config.toml");
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
    })?;
    let file = toml::from_str(&content).map_err(|source| LoadError::Parse { path, source })?;
    Ok(Some(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(app: &str, content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join(app);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), content).unwrap();
        dir
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(dir.path(), "synth").unwrap().is_none());
    }

    #[test]
    fn research_section_maps_to_env_names() {
        let dir = write_config(
            "synth",
            "[research]\nmodel = \"gpt-4o\"\nmax_turns = 12\ntemperature = 0.2\ndb_path = \"/tmp/s.db\"\n",
        );
        let map = load_file(dir.path(), "synth").unwrap().unwrap().into_env_map();
        assert_eq!(map.get("OPENAI_MODEL").map(String::as_str), Some("gpt-4o"));
        assert_eq!(map.get("SYNTH_MAX_TURNS").map(String::as_str), Some("12"));
        assert_eq!(map.get("SYNTH_TEMPERATURE").map(String::as_str), Some("0.2"));
        assert_eq!(map.get("SYNTH_DB").map(String::as_str), Some("/tmp/s.db"));
        assert!(!map.contains_key("PYTHON_BIN"));
    }

    #[test]
    fn env_table_beats_research_table() {
        let dir = write_config(
            "synth",
            "[env]\nOPENAI_MODEL = \"from-env-table\"\n\n[research]\nmodel = \"from-research\"\n",
        );
        let map = load_file(dir.path(), "synth").unwrap().unwrap().into_env_map();
        assert_eq!(map.get("OPENAI_MODEL").map(String::as_str), Some("from-env-table"));
    }

    #[test]
    fn unknown_research_key_is_a_parse_error() {
        let dir = write_config("synth", "[research]\nmax_turn = 3\n");
        let err = load_file(dir.path(), "synth").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }), "{:?}", err);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = write_config("synth", "not valid toml [[[\n");
        assert!(matches!(
            load_file(dir.path(), "synth"),
            Err(LoadError::Parse { .. })
        ));
    }
}
