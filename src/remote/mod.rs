//! Remote object storage for env files.
//!
//! Env files live in a bucket under `{project}/{environment}.env`. The
//! [`RemoteObjectStore`] trait is the seam commands talk to: [`gcs`]
//! implements it over the Cloud Storage JSON API and [`memory`] keeps
//! objects in process for tests.

pub mod gcs;
pub mod memory;

pub use gcs::{GcsStore, TokenProvider, DEFAULT_STORAGE_URL};
pub use memory::MemoryStore;

use crate::error::Result;

/// Suffix of every env object.
pub const OBJECT_SUFFIX: &str = ".env";

/// Byte storage keyed by bucket, project and environment.
///
/// Bucket arguments may carry the `gs://` prefix; implementations
/// normalize them with [`normalize_bucket_name`].
pub trait RemoteObjectStore {
    /// Fetch an env object. Fails with `RemoteObjectNotFound` when absent.
    fn get(&self, bucket: &str, project: &str, environment: &str) -> Result<Vec<u8>>;

    /// Create or replace an env object.
    fn put(&self, bucket: &str, project: &str, environment: &str, data: &[u8]) -> Result<()>;

    /// Environment names stored for a project, sorted.
    fn list(&self, bucket: &str, project: &str) -> Result<Vec<String>>;

    fn exists(&self, bucket: &str, project: &str, environment: &str) -> Result<bool>;

    /// Remove an env object. Fails with `RemoteObjectNotFound` when absent.
    fn delete(&self, bucket: &str, project: &str, environment: &str) -> Result<()>;

    /// Whether the bucket exists and is readable.
    fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Create a bucket owned by `cloud_project`.
    fn create_bucket(&self, bucket: &str, cloud_project: &str) -> Result<()>;
}

/// Strip a `gs://` prefix and a trailing `/`.
///
/// ```
/// use envpull::remote::normalize_bucket_name;
///
/// assert_eq!(normalize_bucket_name("gs://team-envs/"), "team-envs");
/// assert_eq!(normalize_bucket_name("team-envs"), "team-envs");
/// ```
pub fn normalize_bucket_name(bucket: &str) -> &str {
    let bucket = bucket.strip_prefix("gs://").unwrap_or(bucket);
    bucket.strip_suffix('/').unwrap_or(bucket)
}

/// Object key for an environment: `{project}/{environment}.env`.
pub fn object_path(project: &str, environment: &str) -> String {
    format!("{}/{}{}", project, environment, OBJECT_SUFFIX)
}

/// Prefix shared by every object of a project.
pub fn project_prefix(project: &str) -> String {
    format!("{}/", project)
}

/// Environment name for a listed object key.
///
/// Returns `None` for keys outside the project, keys without the `.env`
/// suffix, empty names and names in nested folders.
pub fn env_name_from_object<'a>(project: &str, object_name: &'a str) -> Option<&'a str> {
    let rest = object_name.strip_prefix(&project_prefix(project))?;
    let name = rest.strip_suffix(OBJECT_SUFFIX)?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name)
}
