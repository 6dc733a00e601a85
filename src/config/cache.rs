//! Last-used source and environment cache.
//!
//! The cache is a convenience: a missing file reads as an empty state and
//! callers downgrade save failures to warnings.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::loader::CACHE_FILE_NAME;
use crate::config::schema::ResolutionState;
use crate::error::{EnvpullError, Result};

/// Reads and writes `.envpull.cache` in one directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Cache stored next to the config file in `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join(CACHE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached state. An absent file is an empty state.
    pub fn load(&self) -> Result<ResolutionState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ResolutionState::default())
            }
            Err(e) => return Err(EnvpullError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(ResolutionState::default());
        }

        serde_yaml::from_str(&content).map_err(|e| EnvpullError::ConfigParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Load the cached state, treating any failure as empty.
    pub fn load_or_default(&self) -> ResolutionState {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "Ignoring unreadable cache: {}", e);
            ResolutionState::default()
        })
    }

    pub fn save(&self, state: &ResolutionState) -> Result<()> {
        let yaml = serde_yaml::to_string(state).map_err(|e| EnvpullError::ConfigParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Record the source and environment just used.
    ///
    /// Each field is only overwritten when its new value is non-empty.
    pub fn record(&self, source: &str, environment: &str) -> Result<()> {
        let mut state = self.load_or_default();
        state.update(source, environment);
        tracing::debug!(
            last_source = ?state.last_source,
            last_env = ?state.last_env,
            "Recording cache"
        );
        self.save(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn absent_cache_is_empty() {
        let temp = TempDir::new().unwrap();

        let state = CacheStore::new(temp.path()).load().unwrap();

        assert!(state.is_empty());
    }

    #[test]
    fn reads_existing_cache() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CACHE_FILE_NAME),
            "last_source: simon\nlast_env: develop\n",
        )
        .unwrap();

        let state = CacheStore::new(temp.path()).load().unwrap();

        assert_eq!(state, ResolutionState::new("simon", "develop"));
    }

    #[test]
    fn record_writes_both_fields() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        store.record("simon", "prod").unwrap();

        assert_eq!(store.load().unwrap(), ResolutionState::new("simon", "prod"));
    }

    #[test]
    fn record_keeps_fields_for_empty_values() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());
        store.record("simon", "prod").unwrap();

        store.record("", "develop").unwrap();

        assert_eq!(
            store.load().unwrap(),
            ResolutionState::new("simon", "develop")
        );
    }

    #[test]
    fn record_replaces_corrupt_cache() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CACHE_FILE_NAME), "last_source: [oops").unwrap();
        let store = CacheStore::new(temp.path());

        assert!(store.load().is_err());
        store.record("team", "default").unwrap();

        assert_eq!(
            store.load().unwrap(),
            ResolutionState::new("team", "default")
        );
    }

    #[test]
    fn saved_file_omits_missing_environment() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(temp.path());

        store.save(&ResolutionState::new("simon", "")).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "last_source: simon\n");
    }
}
