//! Pull command implementation.
//!
//! The `envpull pull` command downloads `{project}/{env}.env` from a
//! source and writes it to the local file verbatim.

use std::path::{Path, PathBuf};

use crate::cli::args::PullArgs;
use crate::env;
use crate::error::Result;
use crate::ui::{confirm, UserInterface};

use super::context::{Services, Workspace};
use super::dispatcher::{Command, CommandResult};

/// The pull command implementation.
pub struct PullCommand {
    dir: PathBuf,
    args: PullArgs,
    services: Services,
}

impl PullCommand {
    /// Create a new pull command.
    pub fn new(dir: &Path, args: PullArgs, services: Services) -> Self {
        Self {
            dir: dir.to_path_buf(),
            args,
            services,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &PullArgs {
        &self.args
    }
}

impl Command for PullCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = Workspace::load(&self.dir)?;
        let target = workspace.target(
            ui,
            self.args.source.as_deref(),
            &self.args.env,
            &self.dir.join(&self.args.file),
            "envpull pull <source>",
        )?;
        let project = self.services.project.project_name()?;
        let shown = self.args.file.display();

        if target.local_file().exists() && !self.args.force {
            ui.warning(&format!("File '{}' already exists", shown));
            if !confirm(ui, "overwrite", "Overwrite?", false)? {
                ui.info("Aborted");
                return Ok(CommandResult::success());
            }
        }

        ui.info(&format!(
            "Pulling {}/{} from {}...",
            project,
            target.environment(),
            target.source_name()
        ));
        let mut spinner = ui.start_spinner("Downloading...");
        let data = self
            .services
            .store
            .get(&target.source().bucket, &project, target.environment());
        spinner.finish_and_clear();
        let data = data?;

        env::write_file(target.local_file(), &data)?;
        workspace.record(ui, &target);

        ui.success(&format!(
            "Pulled {}/{}.env to {} ({} bytes)",
            project,
            target.environment(),
            shown,
            data.len()
        ));
        Ok(CommandResult::success())
    }
}
