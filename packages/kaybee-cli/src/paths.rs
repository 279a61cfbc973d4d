/// Default file locations: ~/.config/kaybee/ (or platform equivalent).
use std::path::PathBuf;

use kaybee_core::KaybeeConfig;

fn kaybee_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kaybee")
}

/// Default config path: ~/.config/kaybee/config.json
pub fn default_config_path() -> PathBuf {
    kaybee_dir().join("config.json")
}

/// Store file from config, falling back to ~/.config/kaybee/store.json
pub fn store_path(config: &KaybeeConfig) -> PathBuf {
    config
        .store_path
        .clone()
        .unwrap_or_else(|| kaybee_dir().join("store.json"))
}
