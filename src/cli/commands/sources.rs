//! Sources command implementation.
//!
//! `envpull sources` lists configured sources; `add` and `remove` edit
//! `.envpull.yml` in place.

use std::path::{Path, PathBuf};

use crate::cli::args::{SourceAddArgs, SourceRemoveArgs, SourcesAction, SourcesArgs};
use crate::config::SourceDefinition;
use crate::error::{EnvpullError, Result};
use crate::ui::{confirm, Table, UserInterface};

use super::context::Workspace;
use super::dispatcher::{Command, CommandResult};

/// The sources command implementation.
pub struct SourcesCommand {
    dir: PathBuf,
    args: SourcesArgs,
}

impl SourcesCommand {
    /// Create a new sources command.
    pub fn new(dir: &Path, args: SourcesArgs) -> Self {
        Self {
            dir: dir.to_path_buf(),
            args,
        }
    }

    fn list(&self, ui: &mut dyn UserInterface, workspace: &Workspace) -> Result<CommandResult> {
        let sources = &workspace.config().sources;
        if sources.is_empty() {
            ui.info("No sources configured");
            ui.show_hint("Add a source with: envpull source add NAME --bucket BUCKET --project PROJECT");
            return Ok(CommandResult::success());
        }

        let cached = workspace.cached();
        let mut table = Table::new(vec!["NAME", "BUCKET", "PROJECT"]);
        for source in sources {
            let name = if cached.last_source.as_deref() == Some(source.name.as_str()) {
                format!("{} *", source.name)
            } else {
                source.name.clone()
            };
            table.add_row(vec![name.as_str(), source.bucket.as_str(), source.project.as_str()]);
        }

        ui.message("\nConfigured sources:\n");
        ui.output(&table.render());
        ui.message("");
        Ok(CommandResult::success())
    }

    fn add(
        &self,
        ui: &mut dyn UserInterface,
        mut workspace: Workspace,
        args: &SourceAddArgs,
    ) -> Result<CommandResult> {
        let source = SourceDefinition::new(&args.name, &args.bucket, &args.project);
        workspace.config_mut().add_source(source)?;
        workspace.config().validate()?;
        workspace.save_config()?;

        ui.success(&format!("Added source '{}'", args.name));
        Ok(CommandResult::success())
    }

    fn remove(
        &self,
        ui: &mut dyn UserInterface,
        mut workspace: Workspace,
        args: &SourceRemoveArgs,
    ) -> Result<CommandResult> {
        if !workspace.config().has_source(&args.name) {
            return Err(EnvpullError::SourceNotFound {
                name: args.name.clone(),
                available: workspace.config().source_names(),
            });
        }

        let question = format!("Remove source '{}'?", args.name);
        if !args.yes && !confirm(ui, "remove_source", &question, false)? {
            ui.info("Aborted");
            return Ok(CommandResult::success());
        }

        workspace.config_mut().remove_source(&args.name)?;
        workspace.save_config()?;

        ui.success(&format!("Removed source '{}'", args.name));
        Ok(CommandResult::success())
    }
}

impl Command for SourcesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = Workspace::load(&self.dir)?;
        match &self.args.action {
            None => self.list(ui, &workspace),
            Some(SourcesAction::Add(args)) => self.add(ui, workspace, args),
            Some(SourcesAction::Remove(args)) => self.remove(ui, workspace, args),
        }
    }
}
