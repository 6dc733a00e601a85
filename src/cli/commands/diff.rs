//! Diff command implementation.
//!
//! The `envpull diff` command compares the local env file with a remote
//! env and prints what pulling would change.

use std::path::{Path, PathBuf};

use crate::cli::args::DiffArgs;
use crate::env::{self, compare, render_lines, DiffSummary, EnvSnapshot};
use crate::error::Result;
use crate::ui::UserInterface;

use super::context::{Services, Workspace};
use super::dispatcher::{Command, CommandResult};

/// The diff command implementation.
pub struct DiffCommand {
    dir: PathBuf,
    args: DiffArgs,
    services: Services,
}

impl DiffCommand {
    /// Create a new diff command.
    pub fn new(dir: &Path, args: DiffArgs, services: Services) -> Self {
        Self {
            dir: dir.to_path_buf(),
            args,
            services,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &DiffArgs {
        &self.args
    }
}

impl Command for DiffCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = Workspace::load(&self.dir)?;
        let target = workspace.target(
            ui,
            self.args.source.as_deref(),
            &self.args.env,
            &self.dir.join(&self.args.file),
            "envpull diff <source>",
        )?;
        let project = self.services.project.project_name()?;
        let shown = self.args.file.display();

        let local = if target.local_file().exists() {
            env::load_file(target.local_file())?
        } else {
            ui.warning(&format!("Local file '{}' does not exist", shown));
            EnvSnapshot::new()
        };

        ui.info(&format!(
            "Comparing local '{}' with remote {}/{}/{}.env...",
            shown,
            target.source_name(),
            project,
            target.environment()
        ));

        let mut spinner = ui.start_spinner("Downloading...");
        let data = self
            .services
            .store
            .get(&target.source().bucket, &project, target.environment());
        spinner.finish_and_clear();
        let remote = env::parse(&data?);

        let diff = compare(&local, &remote);
        if !diff.has_changes() {
            ui.success("No differences found");
            return Ok(CommandResult::success());
        }

        ui.output("\n");
        for line in render_lines(&diff) {
            ui.diff_line(&line);
        }

        ui.output(&summary_text(&diff.summary()));

        Ok(CommandResult::success())
    }
}

/// Summary block; the unchanged count is always shown, the others only when non-zero.
fn summary_text(summary: &DiffSummary) -> String {
    let mut text = String::from("\nSummary:\n");
    if summary.added > 0 {
        text.push_str(&format!("  + {} added (in remote)\n", summary.added));
    }
    if summary.removed > 0 {
        text.push_str(&format!("  - {} removed (in local only)\n", summary.removed));
    }
    if summary.modified > 0 {
        text.push_str(&format!("  ~ {} modified\n", summary.modified));
    }
    text.push_str(&format!("  = {} unchanged\n", summary.unchanged));
    text
}
