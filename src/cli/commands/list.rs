//! List command implementation.
//!
//! The `envpull ls` command lists the environments stored for the current
//! project in a source.

use std::path::{Path, PathBuf};

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::resolution::{lookup_source, DEFAULT_ENVIRONMENT};
use crate::ui::UserInterface;

use super::context::{announce, Services, Workspace};
use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    dir: PathBuf,
    args: ListArgs,
    services: Services,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(dir: &Path, args: ListArgs, services: Services) -> Self {
        Self {
            dir: dir.to_path_buf(),
            args,
            services,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = Workspace::load(&self.dir)?;
        let resolved = workspace.resolve(
            self.args.source.as_deref(),
            DEFAULT_ENVIRONMENT,
            "envpull ls <source>",
        )?;
        announce(ui, &resolved, false);
        let source = lookup_source(workspace.config(), &resolved.source)?;
        let project = self.services.project.project_name()?;

        let mut spinner = ui.start_spinner("Listing environments...");
        let names = self.services.store.list(&source.bucket, &project);
        spinner.finish_and_clear();
        let names = names?;

        if names.is_empty() {
            ui.info(&format!(
                "No environments found for project '{}' in source '{}'",
                project, source.name
            ));
            return Ok(CommandResult::success());
        }

        let cached = workspace.cached();
        let current = (cached.last_source.as_deref() == Some(source.name.as_str()))
            .then_some(cached.last_env.as_deref())
            .flatten();

        ui.message(&format!("\nEnvironments for {} in {}:\n", project, source.name));
        let mut listing = String::new();
        for name in &names {
            let marker = if current == Some(name.as_str()) { "*" } else { " " };
            listing.push_str(&format!("  {} {}\n", marker, name));
        }
        ui.output(&listing);
        ui.message("");

        Ok(CommandResult::success())
    }
}
