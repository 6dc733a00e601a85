//! Version command implementation.

use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Version string printed by `envpull version`.
pub fn version_string() -> String {
    format!("envpull {}", env!("CARGO_PKG_VERSION"))
}

/// The version command implementation.
pub struct VersionCommand;

impl Command for VersionCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.output(&format!("{}\n", version_string()));
        Ok(CommandResult::success())
    }
}
