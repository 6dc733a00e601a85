//! Source and environment resolution.
//!
//! Decides which source and environment a command targets from, in
//! priority order:
//!
//! 1. the source argument and `--env` flag of this invocation
//! 2. the cached last-used source, and the cached environment only when
//!    the cached source is the one being used
//! 3. failure, since a source is never guessed
//!
//! [`resolve`] is a pure function so the precedence rules are testable
//! without a config file, a cache file or a network.

use crate::config::ResolutionState;
use crate::error::EnvpullError;

/// Environment used when `--env` is not given.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Given on the command line.
    Explicit,
    /// Taken from the last-used cache.
    Cached,
    /// The built-in default.
    Default,
}

/// What the invocation asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// Positional source argument, if any.
    pub source: Option<String>,
    /// Value of `--env`; [`DEFAULT_ENVIRONMENT`] when the flag was not given.
    pub environment: String,
}

impl ResolutionRequest {
    /// Request with an optional source and an `--env` value.
    pub fn new(source: Option<&str>, environment: &str) -> Self {
        Self {
            source: source.map(str::to_string),
            environment: environment.to_string(),
        }
    }
}

impl Default for ResolutionRequest {
    fn default() -> Self {
        Self::new(None, DEFAULT_ENVIRONMENT)
    }
}

/// A resolved source and environment pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub source: String,
    pub environment: String,
    pub source_origin: Origin,
    pub environment_origin: Origin,
}

/// Why resolution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// Neither the invocation nor the cache named a source.
    NoSourceAvailable,
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedTarget),
    Failed(ResolutionFailure),
}

impl Resolution {
    /// Convert into a `Result`, attaching a usage hint for failures.
    pub fn into_result(self, usage: &str) -> crate::Result<ResolvedTarget> {
        match self {
            Self::Resolved(target) => Ok(target),
            Self::Failed(ResolutionFailure::NoSourceAvailable) => {
                Err(EnvpullError::NoSourceAvailable {
                    usage: usage.to_string(),
                })
            }
        }
    }
}

/// Resolve the source and environment for one invocation.
///
/// An empty source argument counts as absent. The cached environment is
/// only used when `--env` was left at its default, the cached source equals
/// the source being used, and a cached environment exists.
///
/// ```
/// use envpull::config::ResolutionState;
/// use envpull::resolution::{resolve, Resolution, ResolutionRequest};
///
/// let cache = ResolutionState::new("simon", "prod");
/// let request = ResolutionRequest::new(Some("simon"), "default");
///
/// match resolve(&request, &cache) {
///     Resolution::Resolved(target) => assert_eq!(target.environment, "prod"),
///     Resolution::Failed(reason) => panic!("unexpected failure: {:?}", reason),
/// }
/// ```
pub fn resolve(request: &ResolutionRequest, cache: &ResolutionState) -> Resolution {
    let explicit = request.source.as_deref().filter(|s| !s.is_empty());

    let (source, source_origin) = match (explicit, cache.last_source.as_deref()) {
        (Some(source), _) => (source.to_string(), Origin::Explicit),
        (None, Some(cached)) if !cached.is_empty() => (cached.to_string(), Origin::Cached),
        _ => {
            tracing::debug!("No source argument and no cached source");
            return Resolution::Failed(ResolutionFailure::NoSourceAvailable);
        }
    };

    let (environment, environment_origin) = if request.environment != DEFAULT_ENVIRONMENT {
        (request.environment.clone(), Origin::Explicit)
    } else {
        match cache.last_env.as_deref() {
            Some(env) if !env.is_empty() && cache.last_source.as_deref() == Some(source.as_str()) => {
                (env.to_string(), Origin::Cached)
            }
            _ => (DEFAULT_ENVIRONMENT.to_string(), Origin::Default),
        }
    };

    tracing::debug!(
        source = %source,
        environment = %environment,
        ?source_origin,
        ?environment_origin,
        "Resolved target"
    );

    Resolution::Resolved(ResolvedTarget {
        source,
        environment,
        source_origin,
        environment_origin,
    })
}
