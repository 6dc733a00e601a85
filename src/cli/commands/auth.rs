//! Login and whoami commands.
//!
//! Both delegate to `gcloud`; envpull stores no credentials of its own.

use crate::error::{EnvpullError, Result};
use crate::ui::UserInterface;

use super::context::Services;
use super::dispatcher::{Command, CommandResult};

/// The login command implementation.
pub struct LoginCommand {
    services: Services,
}

impl LoginCommand {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

impl Command for LoginCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let gcloud = &self.services.gcloud;
        if !gcloud.is_installed() {
            return Err(EnvpullError::GcloudMissing);
        }

        ui.info("Running gcloud auth application-default login...");
        ui.message("");
        gcloud.login()?;
        ui.message("");
        ui.success("Authentication complete!");

        Ok(CommandResult::success())
    }
}

/// The whoami command implementation.
pub struct WhoamiCommand {
    services: Services,
}

impl WhoamiCommand {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

impl Command for WhoamiCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let identity = self.services.gcloud.identity()?;

        let mut text = format!("\nGoogle Cloud Identity:\n  Account: {}\n", identity.account);
        if let Some(project) = &identity.project {
            text.push_str(&format!("  Project: {}\n", project));
        }
        text.push('\n');
        ui.output(&text);

        Ok(CommandResult::success())
    }
}
