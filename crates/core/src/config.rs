//! Application configuration.
//!
//! Layers, lowest priority first: built-in defaults, the optional TOML file at
//! [`config_path`], then `MECHROSTER_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{catalog::CatalogLoader, save::SaveManager};

/// Directory under the user's config directory holding `config.toml`.
pub const CONFIG_DIR: &str = "mechroster";
/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "MECHROSTER";

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog data directory.
    pub data_dir: PathBuf,
    /// Directory for roster save files.
    pub save_dir: PathBuf,
    /// Directory for log files.
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            save_dir: SaveManager::default_root(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    /// Load from the default config file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load using `path` as the config file; a missing file is skipped.
    pub fn load_from(path: &Path) -> Result<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("data_dir", path_string(&defaults.data_dir))?
            .set_default("save_dir", path_string(&defaults.save_dir))?
            .set_default("log_dir", path_string(&defaults.log_dir))?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
        let config = settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Catalog loader over [`AppConfig::data_dir`].
    pub fn catalog_loader(&self) -> CatalogLoader {
        CatalogLoader::new(&self.data_dir)
    }

    /// Save manager over [`AppConfig::save_dir`].
    pub fn save_manager(&self) -> SaveManager {
        SaveManager::new(&self.save_dir)
    }
}

/// Location of the user configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write a default configuration file unless one exists.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    ensure_default_config_at(&path)?;
    Ok(path)
}

/// Write a default configuration file at `path` unless one exists.
///
/// Returns whether a file was written.
pub fn ensure_default_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let defaults = AppConfig::default();
    let content = format!(
        "# mechroster configuration\n\
         # Every key can be overridden with a {ENV_PREFIX}_<KEY> environment variable.\n\n\
         # Catalog JSON files (mech_data/, weapons.json, back_weapons.json, ...).\n\
         data_dir = '{}'\n\n\
         # Roster save files.\n\
         save_dir = '{}'\n\n\
         log_dir = '{}'\n",
        path_string(&defaults.data_dir),
        path_string(&defaults.save_dir),
        path_string(&defaults.log_dir),
    );
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(true)
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(&dir.path().join("absent.toml"))?;
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.save_dir, SaveManager::default_root());
        Ok(())
    }

    #[test]
    fn file_overrides_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "data_dir = '/srv/mechs'\nsave_dir = '/srv/saves'\n")?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.data_dir, PathBuf::from("/srv/mechs"));
        assert_eq!(config.save_manager().root(), Path::new("/srv/saves"));
        assert_eq!(config.catalog_loader().root(), Path::new("/srv/mechs"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        Ok(())
    }

    #[test]
    fn default_file_is_written_once_and_loads() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_DIR).join(CONFIG_FILE);

        assert!(ensure_default_config_at(&path)?);
        assert!(!ensure_default_config_at(&path)?);

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.data_dir, AppConfig::default().data_dir);
        assert_eq!(config.save_dir, AppConfig::default().save_dir);
        Ok(())
    }
}
