//! Shared command plumbing.
//!
//! [`Services`] bundles the external collaborators a command talks to so
//! tests can swap them for in-memory fakes. [`Workspace`] is the loaded
//! project configuration plus its cache, and owns target resolution.

use std::path::Path;

use crate::config::{load_config, CacheStore, EnvpullConfig, ProjectConfig, ResolutionState};
use crate::error::Result;
use crate::gcloud::GcloudAuth;
use crate::git::{GitProject, ProjectIdentifier};
use crate::remote::gcs::StaticToken;
use crate::remote::{GcsStore, RemoteObjectStore, TokenProvider};
use crate::resolution::{resolve, EffectiveTarget, Origin, ResolutionRequest, ResolvedTarget};
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::UserInterface;

/// External collaborators used by commands.
pub struct Services {
    pub project: Box<dyn ProjectIdentifier>,
    pub store: Box<dyn RemoteObjectStore>,
    pub gcloud: GcloudAuth<Box<dyn CommandRunner>>,
}

impl Services {
    pub fn new(
        project: Box<dyn ProjectIdentifier>,
        store: Box<dyn RemoteObjectStore>,
        gcloud: GcloudAuth<Box<dyn CommandRunner>>,
    ) -> Self {
        Self {
            project,
            store,
            gcloud,
        }
    }

    /// Real git, gcloud and Cloud Storage for `dir`.
    ///
    /// Storage requests authenticate with `access_token` when given and with
    /// gcloud application default credentials otherwise.
    pub fn system(dir: &Path, storage_url: &str, access_token: Option<&str>) -> Result<Self> {
        let tokens: Box<dyn TokenProvider> = match access_token.filter(|t| !t.is_empty()) {
            Some(token) => Box::new(StaticToken(token.to_string())),
            None => Box::new(GcloudAuth::new()),
        };

        Ok(Self::new(
            Box::new(GitProject::new(dir)),
            Box::new(GcsStore::new(storage_url, tokens)?),
            GcloudAuth::with_runner(Box::new(SystemRunner)),
        ))
    }
}

/// Loaded configuration and cache for one invocation.
pub struct Workspace {
    project: ProjectConfig,
    cache: CacheStore,
}

impl Workspace {
    /// Find and load `.envpull.yml` upward from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let project = load_config(dir)?;
        let cache = CacheStore::new(&project.root);
        Ok(Self { project, cache })
    }

    pub fn root(&self) -> &Path {
        &self.project.root
    }

    pub fn config(&self) -> &EnvpullConfig {
        &self.project.config
    }

    pub fn config_mut(&mut self) -> &mut EnvpullConfig {
        &mut self.project.config
    }

    pub fn save_config(&self) -> Result<()> {
        self.project.save()
    }

    /// Cached state; unreadable caches count as empty.
    pub fn cached(&self) -> ResolutionState {
        self.cache.load_or_default()
    }

    /// Resolve source and environment against the cache.
    pub fn resolve(
        &self,
        source: Option<&str>,
        environment: &str,
        usage: &str,
    ) -> Result<ResolvedTarget> {
        let request = ResolutionRequest::new(source, environment);
        resolve(&request, &self.cached()).into_result(usage)
    }

    /// Resolve, announce cached values and look up the source definition.
    pub fn target(
        &self,
        ui: &mut dyn UserInterface,
        source: Option<&str>,
        environment: &str,
        local_file: &Path,
        usage: &str,
    ) -> Result<EffectiveTarget> {
        let resolved = self.resolve(source, environment, usage)?;
        announce(ui, &resolved, true);
        EffectiveTarget::new(self.config(), &resolved, local_file)
    }

    /// Remember the target for the next invocation. Failures only warn.
    pub fn record(&self, ui: &mut dyn UserInterface, target: &EffectiveTarget) {
        if let Err(e) = self.cache.record(target.source_name(), target.environment()) {
            tracing::warn!("Cache write failed: {}", e);
            ui.warning(&format!("Failed to update cache: {}", e));
        }
    }
}

/// Tell the user which values came from the cache.
pub fn announce(ui: &mut dyn UserInterface, resolved: &ResolvedTarget, with_env: bool) {
    if resolved.source_origin == Origin::Cached {
        ui.info(&format!("Using cached source: {}", resolved.source));
    }
    if with_env && resolved.environment_origin == Origin::Cached {
        ui.info(&format!("Using cached env: {}", resolved.environment));
    }
}
