/// Session configuration shared by every front end.
/// Read from config.json in the platform config dir by the CLI; library
/// users build it directly.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::keys::DEFAULT_NAMESPACE;

pub const DEFAULT_BOARD_ID: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KaybeeConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_board_id")]
    pub default_board_id: String,
    /// Location of the key-value store file. `None` means the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_board_id() -> String {
    DEFAULT_BOARD_ID.to_string()
}

impl Default for KaybeeConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            default_board_id: default_board_id(),
            store_path: None,
        }
    }
}

/// Load config from path. Returns default if the file doesn't exist or
/// doesn't parse.
pub fn load_config(path: &Path) -> KaybeeConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            KaybeeConfig::default()
        }),
        Err(_) => {
            log::info!("No config at {}, using defaults", path.display());
            KaybeeConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("config.json"));
        assert_eq!(config, KaybeeConfig::default());
        assert_eq!(config.namespace, "kaybee");
        assert_eq!(config.default_board_id, "1");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"namespace":"work"}"#).unwrap();

        let config = load_config(&path);
        assert_eq!(config.namespace, "work");
        assert_eq!(config.default_board_id, "1");
        assert_eq!(config.store_path, None);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "namespace = work").unwrap();
        assert_eq!(load_config(&path), KaybeeConfig::default());
    }
}
