//! envpull - Share and sync `.env` files through cloud storage buckets.
//!
//! Each repository declares named sources (GCS buckets) in `.envpull.yml`.
//! Env files are stored per project, derived from the git remote, and per
//! environment name as `{project}/{environment}.env`.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `.envpull.yml` and the last-used cache
//! - [`env`] - `.env` parsing, serialization and diffing
//! - [`error`] - Error types and result aliases
//! - [`gcloud`] - `gcloud` CLI wrapper for identity and tokens
//! - [`git`] - Project name detection from the git remote
//! - [`remote`] - Remote object storage
//! - [`resolution`] - Which source and environment a command targets
//! - [`shell`] - External command execution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use envpull::env::{compare, parse, render};
//!
//! let local = parse(b"A=1\nB=2\n");
//! let remote = parse(b"B=2\nC=3\n");
//!
//! let diff = compare(&local, &remote);
//! assert!(diff.has_changes());
//! assert!(render(&diff).contains("+ C=3"));
//! ```

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod gcloud;
pub mod git;
pub mod remote;
pub mod resolution;
pub mod shell;
pub mod ui;

pub use error::{EnvpullError, Result};
