//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Commands that reach git, gcloud or
//! the bucket receive those collaborators as [`Services`], so tests run them
//! against in-memory fakes.

pub mod auth;
pub mod completions;
pub mod context;
pub mod diff;
pub mod dispatcher;
pub mod init;
pub mod list;
pub mod pull;
pub mod push;
pub mod show;
pub mod sources;
pub mod version;

pub use context::{Services, Workspace};
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
