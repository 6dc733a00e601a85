//! Project identification from the git remote.
//!
//! Env objects are scoped by project name: the last path component of the
//! `origin` remote URL, without `.git`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EnvpullError, Result};
use crate::shell::{CommandRunner, SystemRunner};

// scp-like SSH, ssh:// URLs, then http(s) URLs.
static REMOTE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^git@[^:]+:(.+)/([^/]+)$",
        r"^ssh://[^/]+/(.+)/([^/]+)$",
        r"^https?://[^/]+/(.+)/([^/]+)$",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Extract the project name from a git remote URL.
///
/// ```
/// use envpull::git::parse_project_from_url;
///
/// assert_eq!(
///     parse_project_from_url("git@github.com:supercorks/envpull.git").unwrap(),
///     "envpull"
/// );
/// ```
pub fn parse_project_from_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    REMOTE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(trimmed))
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| EnvpullError::ProjectUndetectable {
            message: format!("unable to parse project name from URL: {}", trimmed),
        })
}

/// Supplies the project name that scopes remote objects.
pub trait ProjectIdentifier {
    fn project_name(&self) -> Result<String>;
}

/// Reads the project name from `git remote get-url origin`.
#[derive(Debug, Clone)]
pub struct GitProject<R: CommandRunner = SystemRunner> {
    runner: R,
    dir: PathBuf,
}

impl GitProject<SystemRunner> {
    /// Project of the repository containing `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_runner(SystemRunner, dir)
    }
}

impl<R: CommandRunner> GitProject<R> {
    pub fn with_runner(runner: R, dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// URL of the `origin` remote.
    pub fn origin_url(&self) -> Result<String> {
        let output = self
            .runner
            .run_and_capture("git", &["remote", "get-url", "origin"], Some(&self.dir))
            .map_err(|e| EnvpullError::ProjectUndetectable {
                message: format!("failed to get git remote origin: {}", e),
            })?;

        if !output.success {
            return Err(EnvpullError::ProjectUndetectable {
                message: format!(
                    "failed to get git remote origin: {}",
                    output.stderr.trim()
                ),
            });
        }
        Ok(output.stdout_trimmed().to_string())
    }
}

impl<R: CommandRunner> ProjectIdentifier for GitProject<R> {
    fn project_name(&self) -> Result<String> {
        let url = self.origin_url()?;
        let project = parse_project_from_url(&url)?;
        tracing::debug!(%url, %project, "Detected project");
        Ok(project)
    }
}
