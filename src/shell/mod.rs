//! External program execution and platform checks.

pub mod command;
pub mod platform;

pub use command::{command_line, CommandOutput, CommandRunner, ScriptedRunner, SystemRunner};
pub use platform::{is_ci, no_color_requested};
