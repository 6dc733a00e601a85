//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use clap::CommandFactory;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::remote::DEFAULT_STORAGE_URL;
use crate::ui::UserInterface;

use super::context::Services;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    dir: PathBuf,
    storage_url: String,
    access_token: Option<String>,
}

impl CommandDispatcher {
    /// Create a new dispatcher working in `dir`.
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            storage_url: DEFAULT_STORAGE_URL.to_string(),
            access_token: None,
        }
    }

    /// Use a different storage endpoint and, optionally, a fixed token.
    pub fn with_storage(mut self, storage_url: &str, access_token: Option<String>) -> Self {
        self.storage_url = storage_url.to_string();
        self.access_token = access_token;
        self
    }

    /// Get the working directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn services(&self) -> Result<Services> {
        Services::system(&self.dir, &self.storage_url, self.access_token.as_deref())
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. Without a subcommand, a given source or pull flag
    /// runs `pull`; otherwise help is printed.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let dir = &self.dir;
        match &cli.command {
            Some(Commands::Pull(args)) => {
                super::pull::PullCommand::new(dir, args.clone(), self.services()?).execute(ui)
            }
            Some(Commands::Push(args)) => {
                super::push::PushCommand::new(dir, args.clone(), self.services()?).execute(ui)
            }
            Some(Commands::Diff(args)) => {
                super::diff::DiffCommand::new(dir, args.clone(), self.services()?).execute(ui)
            }
            Some(Commands::Show(args)) => {
                super::show::ShowCommand::new(dir, args.clone(), self.services()?).execute(ui)
            }
            Some(Commands::List(args)) => {
                super::list::ListCommand::new(dir, args.clone(), self.services()?).execute(ui)
            }
            Some(Commands::Sources(args)) => {
                super::sources::SourcesCommand::new(dir, args.clone()).execute(ui)
            }
            Some(Commands::Init(args)) => {
                super::init::InitCommand::new(dir, args.clone(), self.services()?).execute(ui)
            }
            Some(Commands::Login) => super::auth::LoginCommand::new(self.services()?).execute(ui),
            Some(Commands::Whoami) => {
                super::auth::WhoamiCommand::new(self.services()?).execute(ui)
            }
            Some(Commands::Version) => super::version::VersionCommand.execute(ui),
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None if !cli.pull.is_default() => {
                super::pull::PullCommand::new(dir, cli.pull.clone(), self.services()?).execute(ui)
            }
            None => {
                let help = Cli::command().render_help();
                ui.output(&format!("{}\n", help));
                Ok(CommandResult::success())
            }
        }
    }
}
