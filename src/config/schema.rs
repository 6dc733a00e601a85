//! Configuration schema definitions for envpull.
//!
//! These structs map to `.envpull.yml` (named sources) and
//! `.envpull.cache` (last-used source and environment).

use serde::{Deserialize, Serialize};

use crate::error::{EnvpullError, Result};

/// One named remote location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Name used on the command line.
    pub name: String,

    /// Storage bucket, with or without the `gs://` prefix.
    pub bucket: String,

    /// Cloud project that owns the bucket.
    pub project: String,
}

impl SourceDefinition {
    pub fn new(
        name: impl Into<String>,
        bucket: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            bucket: bucket.into(),
            project: project.into(),
        }
    }
}

/// Root structure of `.envpull.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvpullConfig {
    /// Declared sources, in file order.
    pub sources: Vec<SourceDefinition>,
}

impl EnvpullConfig {
    /// Find a source by name.
    pub fn get_source(&self, name: &str) -> Option<&SourceDefinition> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn has_source(&self, name: &str) -> bool {
        self.get_source(name).is_some()
    }

    /// Append a source. Names must be unique.
    pub fn add_source(&mut self, source: SourceDefinition) -> Result<()> {
        if self.has_source(&source.name) {
            return Err(EnvpullError::SourceExists { name: source.name });
        }
        self.sources.push(source);
        Ok(())
    }

    /// Remove a source by name, returning it.
    pub fn remove_source(&mut self, name: &str) -> Result<SourceDefinition> {
        let index = self
            .sources
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| EnvpullError::SourceNotFound {
                name: name.to_string(),
                available: self.source_names(),
            })?;
        Ok(self.sources.remove(index))
    }

    /// Source names in file order.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name.clone()).collect()
    }

    /// Check that every source is complete and names are unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(EnvpullError::ConfigValidationError {
                    message: "source with empty name".to_string(),
                });
            }
            if source.bucket.trim().is_empty() {
                return Err(EnvpullError::ConfigValidationError {
                    message: format!("source '{}' has no bucket", source.name),
                });
            }
            if seen.contains(&source.name.as_str()) {
                return Err(EnvpullError::ConfigValidationError {
                    message: format!("duplicate source '{}'", source.name),
                });
            }
            seen.push(&source.name);
        }
        Ok(())
    }
}

/// Last-used source and environment, stored in `.envpull.cache`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionState {
    #[serde(skip_serializing_if = "is_blank")]
    pub last_source: Option<String>,

    #[serde(skip_serializing_if = "is_blank")]
    pub last_env: Option<String>,
}

impl ResolutionState {
    pub fn new(source: &str, environment: &str) -> Self {
        Self {
            last_source: non_empty(source),
            last_env: non_empty(environment),
        }
    }

    pub fn is_empty(&self) -> bool {
        is_blank(&self.last_source) && is_blank(&self.last_env)
    }

    /// Overwrite each field whose new value is non-empty.
    pub fn update(&mut self, source: &str, environment: &str) {
        if let Some(source) = non_empty(source) {
            self.last_source = Some(source);
        }
        if let Some(environment) = non_empty(environment) {
            self.last_env = Some(environment);
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}
