//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::remote::DEFAULT_STORAGE_URL;
use crate::resolution::DEFAULT_ENVIRONMENT;

/// Local file used when `--file` is not given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// envpull - Share and sync .env files through GCS buckets.
#[derive(Debug, Parser)]
#[command(name = "envpull")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:
  envpull simon                  Pull the default env from the 'simon' source
  envpull simon --env develop    Pull a specific environment
  envpull push simon             Push the local .env
  envpull ls simon               List available environments
  envpull init                   Initialize a new project")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    // `envpull SOURCE` is shorthand for `envpull pull SOURCE`
    #[command(flatten)]
    pub pull: PullArgs,

    /// Working directory (overrides current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Cloud Storage endpoint
    #[arg(
        long,
        global = true,
        hide = true,
        env = "ENVPULL_STORAGE_URL",
        default_value = DEFAULT_STORAGE_URL
    )]
    pub storage_url: String,

    /// OAuth access token used instead of gcloud credentials
    #[arg(
        long,
        global = true,
        hide = true,
        env = "ENVPULL_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub access_token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pull an env file from a remote source
    Pull(PullArgs),

    /// Push a local env file to a remote source
    Push(PushArgs),

    /// Compare the local env file with a remote one
    Diff(DiffArgs),

    /// Print a remote env file to stdout
    Show(ShowArgs),

    /// List available environments from a source
    #[command(name = "ls", visible_alias = "list")]
    List(ListArgs),

    /// Manage configured sources
    #[command(visible_alias = "source")]
    Sources(SourcesArgs),

    /// Initialize envpull configuration
    Init(InitArgs),

    /// Authenticate with Google Cloud
    Login,

    /// Show the current gcloud identity
    Whoami,

    /// Print version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `pull` command.
#[derive(Debug, Clone, clap::Args)]
pub struct PullArgs {
    /// Source to pull from (defaults to the last used source)
    pub source: Option<String>,

    /// Environment name (e.g. develop, prod)
    #[arg(short, long, default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,

    /// Local file path to write
    #[arg(short, long, default_value = DEFAULT_ENV_FILE)]
    pub file: PathBuf,

    /// Overwrite an existing file without confirmation
    #[arg(long)]
    pub force: bool,
}

impl Default for PullArgs {
    fn default() -> Self {
        Self {
            source: None,
            env: DEFAULT_ENVIRONMENT.to_string(),
            file: PathBuf::from(DEFAULT_ENV_FILE),
            force: false,
        }
    }
}

impl PullArgs {
    /// Whether nothing was given on the command line.
    pub fn is_default(&self) -> bool {
        self.source.is_none()
            && self.env == DEFAULT_ENVIRONMENT
            && self.file.as_os_str() == DEFAULT_ENV_FILE
            && !self.force
    }
}

/// Arguments for the `push` command.
#[derive(Debug, Clone, clap::Args)]
pub struct PushArgs {
    /// Source to push to (defaults to the last used source)
    pub source: Option<String>,

    /// Environment name to push as
    #[arg(short, long, default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,

    /// Local file path to read
    #[arg(short, long, default_value = DEFAULT_ENV_FILE)]
    pub file: PathBuf,

    /// Overwrite an existing remote env without confirmation
    #[arg(long)]
    pub force: bool,
}

impl Default for PushArgs {
    fn default() -> Self {
        Self {
            source: None,
            env: DEFAULT_ENVIRONMENT.to_string(),
            file: PathBuf::from(DEFAULT_ENV_FILE),
            force: false,
        }
    }
}

/// Arguments for the `diff` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DiffArgs {
    /// Source to compare against (defaults to the last used source)
    pub source: Option<String>,

    /// Environment name to compare against
    #[arg(short, long, default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,

    /// Local file path to compare
    #[arg(short, long, default_value = DEFAULT_ENV_FILE)]
    pub file: PathBuf,
}

impl Default for DiffArgs {
    fn default() -> Self {
        Self {
            source: None,
            env: DEFAULT_ENVIRONMENT.to_string(),
            file: PathBuf::from(DEFAULT_ENV_FILE),
        }
    }
}

/// Arguments for the `show` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ShowArgs {
    /// Source to read from (defaults to the last used source)
    pub source: Option<String>,

    /// Environment name to show
    #[arg(short, long, default_value = DEFAULT_ENVIRONMENT)]
    pub env: String,
}

impl Default for ShowArgs {
    fn default() -> Self {
        Self {
            source: None,
            env: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

/// Arguments for the `ls` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Source to list (defaults to the last used source)
    pub source: Option<String>,
}

/// Arguments for the `sources` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SourcesArgs {
    #[command(subcommand)]
    pub action: Option<SourcesAction>,
}

/// Source management actions. Without one, sources are listed.
#[derive(Debug, Clone, Subcommand)]
pub enum SourcesAction {
    /// Add a new source
    Add(SourceAddArgs),

    /// Remove a source
    #[command(visible_aliases = ["rm", "delete"])]
    Remove(SourceRemoveArgs),
}

/// Arguments for `sources add`.
#[derive(Debug, Clone, clap::Args)]
pub struct SourceAddArgs {
    /// Source name (e.g. your name or 'team')
    pub name: String,

    /// GCS bucket (e.g. gs://my-envs)
    #[arg(short, long)]
    pub bucket: String,

    /// GCP project ID
    #[arg(short, long)]
    pub project: String,
}

/// Arguments for `sources remove`.
#[derive(Debug, Clone, clap::Args)]
pub struct SourceRemoveArgs {
    /// Source name
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Name of the first source
    #[arg(long)]
    pub source: Option<String>,

    /// GCS bucket of the first source
    #[arg(long)]
    pub bucket: Option<String>,

    /// GCP project ID owning the bucket
    #[arg(long)]
    pub gcp_project: Option<String>,

    /// Overwrite an existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
