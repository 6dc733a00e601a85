//! Error types for envpull operations.
//!
//! This module defines [`EnvpullError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `EnvpullError` for failures the user can act on (missing config,
//!   unknown source, missing remote environment)
//! - Use `anyhow::Error` (via `EnvpullError::Other`) for unexpected errors
//! - Every variant is fatal for the current invocation; nothing is retried

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for envpull operations.
#[derive(Debug, Error)]
pub enum EnvpullError {
    /// No `.envpull.yml` in the working directory or any parent.
    #[error("No .envpull.yml found in {start} or any parent directory\n\nRun 'envpull init' to create a configuration")]
    ConfigNotFound { start: PathBuf },

    /// Failed to parse a configuration or cache file.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// `init` found an existing `.envpull.yml`.
    #[error("{path} already exists\n\nUse --force to overwrite it")]
    ConfigExists { path: PathBuf },

    /// Configuration values are missing or inconsistent.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The named source is not declared in `.envpull.yml`.
    #[error("Source '{name}' not found in config\n\nAvailable sources: {}", format_names(.available))]
    SourceNotFound {
        name: String,
        available: Vec<String>,
    },

    /// A source with this name is already declared.
    #[error("Source '{name}' already exists")]
    SourceExists { name: String },

    /// No source was given and none is cached.
    #[error("No source specified and no cached source found\n\nUsage: {usage}")]
    NoSourceAvailable { usage: String },

    /// The environment object does not exist at the resolved location.
    #[error("Environment '{environment}' not found in {bucket}/{project}")]
    RemoteObjectNotFound {
        environment: String,
        bucket: String,
        project: String,
    },

    /// The project name could not be derived from git.
    #[error("Failed to detect project name: {message}")]
    ProjectUndetectable { message: String },

    /// Any other failure talking to the remote store.
    #[error("Remote storage error: {message}")]
    RemoteTransportFailure { message: String },

    /// The `gcloud` CLI could not be run.
    #[error("gcloud CLI is not installed\n\nInstall it from: https://cloud.google.com/sdk/docs/install")]
    GcloudMissing,

    /// No usable gcloud credentials.
    #[error("Not authenticated: {message}\n\nRun 'envpull login' to authenticate")]
    NotAuthenticated { message: String },

    /// A local env file that must exist is missing.
    #[error("File '{path}' not found")]
    LocalFileNotFound { path: PathBuf },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

impl EnvpullError {
    /// Wrap a transport-level failure with context.
    pub fn transport(context: &str, err: impl std::fmt::Display) -> Self {
        Self::RemoteTransportFailure {
            message: format!("{}: {}", context, err),
        }
    }
}

/// Result type alias for envpull operations.
pub type Result<T> = std::result::Result<T, EnvpullError>;
