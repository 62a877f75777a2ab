//! Shell configuration loaded from an optional JSON file.

use crate::error::ConfigError;
use devboard_core::EngineConfig;
use devboard_core::storage::DEFAULT_DOCUMENT_KEY;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the shell and the engine it hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Where board documents are stored. Platform data dir when unset.
    pub data_dir: Option<PathBuf>,
    /// Key of the document the shell works on.
    pub document_key: String,
    pub engine: EngineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            document_key: DEFAULT_DOCUMENT_KEY.to_string(),
            engine: EngineConfig::default(),
        }
    }
}

/// Load configuration from `path`. No path or a missing file gives defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    if !path.exists() {
        info!("Config {} not found, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_path_is_default() {
        assert_eq!(load_config(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_nested_engine_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("devboard.json");
        fs::write(
            &path,
            r#"{"documentKey": "team", "engine": {"historyCapacity": 5, "rngSeed": 9}}"#,
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.document_key, "team");
        assert_eq!(config.engine.history_capacity, 5);
        assert_eq!(config.engine.rng_seed, Some(9));
        assert_eq!(config.engine.max_distance, EngineConfig::default().max_distance);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ engine: ").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
