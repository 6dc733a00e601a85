//! External program execution.
//!
//! envpull shells out to `git` and `gcloud`. Commands go through the
//! [`CommandRunner`] trait so callers can swap in [`ScriptedRunner`] in
//! tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::error::{EnvpullError, Result};

/// Result of running an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Captured standard output (empty when inherited).
    pub stdout: String,

    /// Captured standard error (empty when inherited).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the program exited with code 0.
    pub success: bool,
}

impl CommandOutput {
    /// Create a success result.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            duration: Duration::ZERO,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            duration: Duration::ZERO,
            success: false,
        }
    }

    /// Trimmed standard output.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// Render a program and its arguments the way a user would type them.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs external programs.
pub trait CommandRunner {
    /// Run with stdout and stderr captured.
    ///
    /// A program that cannot be started is an error; a non-zero exit is
    /// reported through [`CommandOutput::success`].
    fn run_and_capture(&self, program: &str, args: &[&str], cwd: Option<&Path>)
        -> Result<CommandOutput>;

    /// Run attached to the terminal, for interactive programs.
    fn run_inherited(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run_and_capture(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<CommandOutput> {
        (**self).run_and_capture(program, args, cwd)
    }

    fn run_inherited(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        (**self).run_inherited(program, args)
    }
}

/// Runs programs with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run_and_capture(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<CommandOutput> {
        let start = Instant::now();
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        tracing::debug!(command = %command_line(program, args), "Running");
        let output = cmd.output().map_err(|e| {
            tracing::debug!("Failed to start {}: {}", program, e);
            EnvpullError::CommandFailed {
                command: command_line(program, args),
                code: None,
            }
        })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration: start.elapsed(),
            success: output.status.success(),
        })
    }

    fn run_inherited(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let start = Instant::now();
        tracing::debug!(command = %command_line(program, args), "Running interactively");

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|_| EnvpullError::CommandFailed {
                command: command_line(program, args),
                code: None,
            })?;

        Ok(CommandOutput {
            exit_code: status.code(),
            stdout: String::new(),
            stderr: String::new(),
            duration: start.elapsed(),
            success: status.success(),
        })
    }
}

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<String, CommandOutput>,
    calls: Vec<String>,
    cwds: Vec<Option<PathBuf>>,
}

/// Runner answering from canned responses, for tests.
///
/// Commands without a response behave like a missing program. Clones share
/// responses and the call log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    script: Rc<RefCell<Script>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` (program and args joined by spaces) with `output`.
    pub fn respond(&self, command: &str, output: CommandOutput) -> &Self {
        self.script
            .borrow_mut()
            .responses
            .insert(command.to_string(), output);
        self
    }

    /// Command lines run so far.
    pub fn calls(&self) -> Vec<String> {
        self.script.borrow().calls.clone()
    }

    pub fn was_called(&self, command: &str) -> bool {
        self.script.borrow().calls.iter().any(|c| c == command)
    }

    /// Working directories passed to captured runs.
    pub fn cwds(&self) -> Vec<Option<PathBuf>> {
        self.script.borrow().cwds.clone()
    }

    fn answer(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
        let line = command_line(program, args);
        let mut script = self.script.borrow_mut();
        script.calls.push(line.clone());
        script.cwds.push(cwd.map(Path::to_path_buf));
        script
            .responses
            .get(&line)
            .cloned()
            .ok_or(EnvpullError::CommandFailed {
                command: line,
                code: None,
            })
    }
}

impl CommandRunner for ScriptedRunner {
    fn run_and_capture(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<CommandOutput> {
        self.answer(program, args, cwd)
    }

    fn run_inherited(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        self.answer(program, args, None)
    }
}
