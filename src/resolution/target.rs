//! Effective command targets.

use std::path::{Path, PathBuf};

use crate::config::{EnvpullConfig, SourceDefinition};
use crate::error::{EnvpullError, Result};

use super::policy::ResolvedTarget;

/// Look up a resolved source name in the configuration.
///
/// Kept apart from [`resolve`](super::resolve) so the policy never needs a
/// loaded configuration.
pub fn lookup_source<'a>(config: &'a EnvpullConfig, name: &str) -> Result<&'a SourceDefinition> {
    config
        .get_source(name)
        .ok_or_else(|| EnvpullError::SourceNotFound {
            name: name.to_string(),
            available: config.source_names(),
        })
}

/// The source, environment and local file one invocation acts on.
///
/// Built once per command and not changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveTarget {
    source: SourceDefinition,
    environment: String,
    local_file: PathBuf,
}

impl EffectiveTarget {
    /// Resolve the source definition and bind the local file path.
    pub fn new(
        config: &EnvpullConfig,
        resolved: &ResolvedTarget,
        local_file: impl Into<PathBuf>,
    ) -> Result<Self> {
        let source = lookup_source(config, &resolved.source)?.clone();
        Ok(Self {
            source,
            environment: resolved.environment.clone(),
            local_file: local_file.into(),
        })
    }

    pub fn source(&self) -> &SourceDefinition {
        &self.source
    }

    pub fn source_name(&self) -> &str {
        &self.source.name
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn local_file(&self) -> &Path {
        &self.local_file
    }
}
