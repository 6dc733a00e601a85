//! Init command implementation.
//!
//! The `envpull init` command writes `.envpull.yml` with a first source,
//! checking bucket access on the way, and keeps the cache file out of git.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::InitArgs;
use crate::config::{
    config_exists, create_config, save_config, EnvpullConfig, SourceDefinition, CACHE_FILE_NAME,
    CONFIG_FILE_NAME,
};
use crate::error::{EnvpullError, Result};
use crate::ui::{confirm, input, UserInterface};

use super::context::Services;
use super::dispatcher::{Command, CommandResult};

const BUCKET_SCHEME: &str = "gs://";

/// The init command implementation.
pub struct InitCommand {
    dir: PathBuf,
    args: InitArgs,
    services: Services,
}

impl InitCommand {
    /// Create a new init command.
    pub fn new(dir: &Path, args: InitArgs, services: Services) -> Self {
        Self {
            dir: dir.to_path_buf(),
            args,
            services,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &InitArgs {
        &self.args
    }

    /// Use the flag value when given, otherwise ask. Empty answers fail.
    fn value(
        &self,
        ui: &mut dyn UserInterface,
        flag: Option<&str>,
        key: &str,
        question: &str,
        default: Option<&str>,
        label: &str,
    ) -> Result<String> {
        let value = match flag.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => value.to_string(),
            None => input(ui, key, question, default)?,
        };
        if value.is_empty() {
            return Err(EnvpullError::ConfigValidationError {
                message: format!("{} is required", label),
            });
        }
        Ok(value)
    }

    fn detect_project(&self, ui: &mut dyn UserInterface) -> Result<String> {
        match self.services.project.project_name() {
            Ok(name) => {
                ui.success(&format!("Detected project: {}", name));
                Ok(name)
            }
            Err(e) => {
                ui.warning(&format!("Could not detect project name from git: {}", e));
                ui.show_hint("envpull uses the git remote 'origin' to scope env files");
                self.value(ui, None, "project_name", "Project name", None, "project name")
            }
        }
    }

    fn check_bucket(&self, ui: &mut dyn UserInterface, bucket: &str, gcp_project: &str) -> Result<()> {
        let store = &self.services.store;
        match store.bucket_exists(bucket) {
            Err(e) => {
                ui.warning(&format!("Could not verify bucket access: {}", e));
                ui.show_hint("You may need to run 'envpull login' first");
            }
            Ok(true) => ui.success("Verified bucket access"),
            Ok(false) => {
                ui.warning(&format!("Bucket '{}' does not exist", bucket));
                if confirm(ui, "create_bucket", "Create it?", false)? {
                    store.create_bucket(bucket, gcp_project)?;
                    ui.success(&format!("Created bucket '{}'", bucket));
                }
            }
        }
        Ok(())
    }
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if config_exists(&self.dir) && !self.args.force {
            return Err(EnvpullError::ConfigExists {
                path: self.dir.join(CONFIG_FILE_NAME),
            });
        }

        let project = self.detect_project(ui)?;
        tracing::debug!(%project, "Initializing");
        let default_gcp_project = self.services.gcloud.current_project();

        ui.message("\nLet's configure your first source:\n");

        let source_name = self.value(
            ui,
            self.args.source.as_deref(),
            "source_name",
            "Source name (e.g., your name or 'team')",
            None,
            "source name",
        )?;
        let bucket = self.value(
            ui,
            self.args.bucket.as_deref(),
            "bucket",
            "GCS bucket (e.g., gs://my-envs)",
            None,
            "bucket name",
        )?;
        let bucket = with_bucket_scheme(&bucket);
        let gcp_project = self.value(
            ui,
            self.args.gcp_project.as_deref(),
            "gcp_project",
            "GCP project ID",
            default_gcp_project.as_deref(),
            "GCP project",
        )?;

        self.check_bucket(ui, &bucket, &gcp_project)?;

        let config = EnvpullConfig {
            sources: vec![SourceDefinition::new(&source_name, &bucket, &gcp_project)],
        };
        if self.args.force {
            save_config(&self.dir, &config)?;
        } else {
            create_config(&self.dir, &config)?;
        }
        ui.success(&format!("Created {}", CONFIG_FILE_NAME));

        match add_to_gitignore(&self.dir, CACHE_FILE_NAME) {
            Ok(true) => ui.success(&format!("Added {} to .gitignore", CACHE_FILE_NAME)),
            Ok(false) => {}
            Err(e) => ui.warning(&format!("Could not update .gitignore: {}", e)),
        }

        ui.message("\nenvpull is ready!");
        ui.message("\nNext steps:");
        ui.message(&format!("  • Push your first env:  envpull push {}", source_name));
        ui.message(&format!("  • Pull an env:          envpull {}", source_name));
        ui.message(&format!("  • List environments:    envpull ls {}", source_name));

        Ok(CommandResult::success())
    }
}

/// Prefix a bucket with `gs://` unless it already has it.
fn with_bucket_scheme(bucket: &str) -> String {
    if bucket.starts_with(BUCKET_SCHEME) {
        bucket.to_string()
    } else {
        format!("{}{}", BUCKET_SCHEME, bucket)
    }
}

/// Append `entry` to `dir/.gitignore` unless a line already matches it.
///
/// Returns whether the file changed.
fn add_to_gitignore(dir: &Path, entry: &str) -> Result<bool> {
    let path = dir.join(".gitignore");
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if content.lines().any(|line| line.trim() == entry) {
        return Ok(false);
    }

    let mut updated = content;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(entry);
    updated.push('\n');
    fs::write(&path, updated)?;
    Ok(true)
}
