use crate::index::IndexConfig;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "wordex";
const CONFIG_FILE: &str = "config.json";

/// Load the index configuration.
///
/// An explicit path must exist. Without one, the per-user config file is
/// used if present, otherwise the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<IndexConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        return load_config_file(path);
    }

    match get_config_path() {
        Some(path) if path.exists() => load_config_file(&path),
        _ => Ok(IndexConfig::default()),
    }
}

/// Parse a JSON config file; missing fields take their defaults
pub fn load_config_file(path: &Path) -> Result<IndexConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: IndexConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Path of the per-user config file
/// (`~/.config/wordex/config.json` on Linux)
pub fn get_config_path() -> Option<PathBuf> {
    get_app_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Per-user configuration directory for the application
pub fn get_app_config_dir() -> Option<PathBuf> {
    let base = if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        dirs::config_dir()
    };
    base.map(|b| b.join(APP_NAME))
}
