//! Show command implementation.
//!
//! The `envpull show` command prints a remote env file to stdout. Nothing
//! else is written to stdout so the output can be piped.

use std::path::{Path, PathBuf};

use crate::cli::args::ShowArgs;
use crate::error::Result;
use crate::resolution::lookup_source;
use crate::ui::UserInterface;

use super::context::{Services, Workspace};
use super::dispatcher::{Command, CommandResult};

/// The show command implementation.
pub struct ShowCommand {
    dir: PathBuf,
    args: ShowArgs,
    services: Services,
}

impl ShowCommand {
    /// Create a new show command.
    pub fn new(dir: &Path, args: ShowArgs, services: Services) -> Self {
        Self {
            dir: dir.to_path_buf(),
            args,
            services,
        }
    }
}

impl Command for ShowCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = Workspace::load(&self.dir)?;
        let resolved =
            workspace.resolve(self.args.source.as_deref(), &self.args.env, "envpull show <source>")?;
        let source = lookup_source(workspace.config(), &resolved.source)?;
        let project = self.services.project.project_name()?;

        let data = self
            .services
            .store
            .get(&source.bucket, &project, &resolved.environment)?;

        ui.output(&String::from_utf8_lossy(&data));
        Ok(CommandResult::success())
    }
}
