//! Configuration file discovery, loading and saving.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::EnvpullConfig;
use crate::error::{EnvpullError, Result};

/// Project configuration file name.
pub const CONFIG_FILE_NAME: &str = ".envpull.yml";

/// Last-used cache file name, kept next to the config file.
pub const CACHE_FILE_NAME: &str = ".envpull.cache";

/// A loaded configuration together with the directory it was found in.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Directory holding `.envpull.yml`.
    pub root: PathBuf,
    pub config: EnvpullConfig,
}

impl ProjectConfig {
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.root.join(CACHE_FILE_NAME)
    }

    /// Write the configuration back to where it was loaded from.
    pub fn save(&self) -> Result<()> {
        save_config(&self.root, &self.config)
    }
}

/// Find the directory holding `.envpull.yml` by walking up from `start`.
pub fn find_config_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Discover and load the configuration that governs `start`.
///
/// # Errors
///
/// Returns `ConfigNotFound` if no directory from `start` upward holds a
/// config file, and `ConfigParseError` if the YAML is invalid.
pub fn load_config(start: &Path) -> Result<ProjectConfig> {
    let root = find_config_dir(start).ok_or_else(|| EnvpullError::ConfigNotFound {
        start: start.to_path_buf(),
    })?;
    let config = load_config_file(&root.join(CONFIG_FILE_NAME))?;
    tracing::debug!(root = %root.display(), sources = config.sources.len(), "Loaded config");
    Ok(ProjectConfig { root, config })
}

/// Load a single config file.
pub fn load_config_file(path: &Path) -> Result<EnvpullConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvpullError::ConfigNotFound {
                start: path.parent().unwrap_or(path).to_path_buf(),
            }
        } else {
            EnvpullError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into an [`EnvpullConfig`].
///
/// `source_path` is only used for error reporting.
pub fn parse_config(content: &str, source_path: &Path) -> Result<EnvpullConfig> {
    if content.trim().is_empty() {
        return Ok(EnvpullConfig::default());
    }
    let config: EnvpullConfig =
        serde_yaml::from_str(content).map_err(|e| EnvpullError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;
    config.validate()?;
    Ok(config)
}

/// Write `.envpull.yml` into `dir`, replacing any existing file.
pub fn save_config(dir: &Path, config: &EnvpullConfig) -> Result<()> {
    let path = dir.join(CONFIG_FILE_NAME);
    let yaml = serde_yaml::to_string(config).map_err(|e| EnvpullError::ConfigParseError {
        path: path.clone(),
        message: e.to_string(),
    })?;
    fs::write(&path, yaml)?;
    tracing::debug!(path = %path.display(), "Saved config");
    Ok(())
}

pub fn config_exists(dir: &Path) -> bool {
    dir.join(CONFIG_FILE_NAME).is_file()
}

/// Write a new `.envpull.yml` into `dir`, refusing to replace one.
pub fn create_config(dir: &Path, config: &EnvpullConfig) -> Result<()> {
    if config_exists(dir) {
        return Err(EnvpullError::ConfigExists {
            path: dir.join(CONFIG_FILE_NAME),
        });
    }
    save_config(dir, config)
}
