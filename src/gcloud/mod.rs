//! Wrapper around the `gcloud` CLI.
//!
//! Authentication is delegated to Application Default Credentials managed
//! by `gcloud`; envpull only asks it for identities and access tokens.

use crate::error::{EnvpullError, Result};
use crate::remote::TokenProvider;
use crate::shell::{command_line, CommandOutput, CommandRunner, SystemRunner};

const GCLOUD: &str = "gcloud";
const LOGIN_ARGS: &[&str] = &["auth", "application-default", "login"];
const TOKEN_ARGS: &[&str] = &["auth", "application-default", "print-access-token"];

/// Identity reported by `gcloud config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account: String,
    pub project: Option<String>,
}

/// Runs `gcloud` through a [`CommandRunner`].
#[derive(Debug, Clone, Default)]
pub struct GcloudAuth<R: CommandRunner = SystemRunner> {
    runner: R,
}

impl GcloudAuth<SystemRunner> {
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl<R: CommandRunner> GcloudAuth<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    fn capture(&self, args: &[&str]) -> Result<CommandOutput> {
        self.runner.run_and_capture(GCLOUD, args, None)
    }

    /// Whether `gcloud version` runs.
    pub fn is_installed(&self) -> bool {
        self.capture(&["version"]).map(|o| o.success).unwrap_or(false)
    }

    fn ensure_installed(&self) -> Result<()> {
        if self.is_installed() {
            Ok(())
        } else {
            Err(EnvpullError::GcloudMissing)
        }
    }

    /// Run the interactive Application Default Credentials login.
    pub fn login(&self) -> Result<()> {
        self.ensure_installed()?;
        let output = self.runner.run_inherited(GCLOUD, LOGIN_ARGS)?;
        if !output.success {
            return Err(EnvpullError::CommandFailed {
                command: command_line(GCLOUD, LOGIN_ARGS),
                code: output.exit_code,
            });
        }
        Ok(())
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        let output = self.capture(&["config", "get-value", key])?;
        if !output.success {
            return Err(EnvpullError::NotAuthenticated {
                message: format!("failed to get gcloud {}", key),
            });
        }
        let value = output.stdout_trimmed();
        Ok(if value.is_empty() || value == "(unset)" {
            None
        } else {
            Some(value.to_string())
        })
    }

    /// Active account. Fails when none is configured.
    pub fn current_account(&self) -> Result<String> {
        self.config_value("account")?
            .ok_or_else(|| EnvpullError::NotAuthenticated {
                message: "no gcloud account configured".to_string(),
            })
    }

    /// Active project, if any.
    pub fn current_project(&self) -> Option<String> {
        self.config_value("project").ok().flatten()
    }

    /// Account and project, checking that gcloud is installed first.
    pub fn identity(&self) -> Result<Identity> {
        self.ensure_installed()?;
        Ok(Identity {
            account: self.current_account()?,
            project: self.current_project(),
        })
    }
}

impl<R: CommandRunner> TokenProvider for GcloudAuth<R> {
    fn access_token(&self) -> Result<String> {
        tracing::debug!("Fetching access token from gcloud");
        let output = self.capture(TOKEN_ARGS).map_err(|e| match e {
            EnvpullError::CommandFailed { code: None, .. } => EnvpullError::GcloudMissing,
            other => other,
        })?;

        let token = output.stdout_trimmed();
        if !output.success || token.is_empty() {
            return Err(EnvpullError::NotAuthenticated {
                message: "no application default credentials".to_string(),
            });
        }
        Ok(token.to_string())
    }
}
