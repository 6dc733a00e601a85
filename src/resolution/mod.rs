//! Target resolution for commands.
//!
//! - [`policy`] picks the source and environment from arguments and cache
//! - [`target`] binds the picked source to its configuration entry

pub mod policy;
pub mod target;

pub use policy::{
    resolve, Origin, Resolution, ResolutionFailure, ResolutionRequest, ResolvedTarget,
    DEFAULT_ENVIRONMENT,
};
pub use target::{lookup_source, EffectiveTarget};
