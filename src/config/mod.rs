//! Project configuration and last-used cache.
//!
//! - Schema definitions in [`schema`]
//! - Discovery, loading and saving of `.envpull.yml` in [`loader`]
//! - The `.envpull.cache` store in [`cache`]
//!
//! # Example
//!
//! ```
//! use envpull::config::{load_config, CONFIG_FILE_NAME};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join(CONFIG_FILE_NAME),
//!     "sources:\n  - name: simon\n    bucket: gs://envs\n    project: my-gcp\n",
//! )
//! .unwrap();
//!
//! let project = load_config(temp.path()).unwrap();
//! assert!(project.config.has_source("simon"));
//! ```

pub mod cache;
pub mod loader;
pub mod schema;

pub use cache::CacheStore;
pub use loader::{
    config_exists, create_config, find_config_dir, load_config, load_config_file, parse_config,
    save_config, ProjectConfig, CACHE_FILE_NAME, CONFIG_FILE_NAME,
};
pub use schema::{EnvpullConfig, ResolutionState, SourceDefinition};
