//! In-process object store.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use super::{env_name_from_object, normalize_bucket_name, object_path, RemoteObjectStore};
use crate::error::{EnvpullError, Result};

#[derive(Debug, Default)]
struct State {
    buckets: BTreeSet<String>,
    objects: BTreeMap<(String, String), Vec<u8>>,
    failing_exists: bool,
}

/// [`RemoteObjectStore`] keeping objects in memory.
///
/// Clones share the same objects, so a test can keep a handle while a
/// command owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one existing, empty bucket.
    pub fn with_bucket(bucket: &str) -> Self {
        let store = Self::new();
        store
            .state
            .borrow_mut()
            .buckets
            .insert(normalize_bucket_name(bucket).to_string());
        store
    }

    /// Seed an object, creating its bucket.
    pub fn insert(&self, bucket: &str, project: &str, environment: &str, data: &[u8]) {
        let bucket = normalize_bucket_name(bucket).to_string();
        let mut state = self.state.borrow_mut();
        state.buckets.insert(bucket.clone());
        state
            .objects
            .insert((bucket, object_path(project, environment)), data.to_vec());
    }

    /// Current bytes of an object.
    pub fn object(&self, bucket: &str, project: &str, environment: &str) -> Option<Vec<u8>> {
        self.state
            .borrow()
            .objects
            .get(&key(bucket, project, environment))
            .cloned()
    }

    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.state
            .borrow()
            .buckets
            .contains(normalize_bucket_name(bucket))
    }

    /// Make every `exists` call fail with a transport error.
    pub fn fail_exists_checks(&self) {
        self.state.borrow_mut().failing_exists = true;
    }
}

fn key(bucket: &str, project: &str, environment: &str) -> (String, String) {
    (
        normalize_bucket_name(bucket).to_string(),
        object_path(project, environment),
    )
}

fn not_found(bucket: &str, project: &str, environment: &str) -> EnvpullError {
    EnvpullError::RemoteObjectNotFound {
        environment: environment.to_string(),
        bucket: normalize_bucket_name(bucket).to_string(),
        project: project.to_string(),
    }
}

impl RemoteObjectStore for MemoryStore {
    fn get(&self, bucket: &str, project: &str, environment: &str) -> Result<Vec<u8>> {
        self.object(bucket, project, environment)
            .ok_or_else(|| not_found(bucket, project, environment))
    }

    fn put(&self, bucket: &str, project: &str, environment: &str, data: &[u8]) -> Result<()> {
        self.insert(bucket, project, environment, data);
        Ok(())
    }

    fn list(&self, bucket: &str, project: &str) -> Result<Vec<String>> {
        let bucket = normalize_bucket_name(bucket);
        let state = self.state.borrow();
        // BTreeMap order keeps names sorted.
        let names = state
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .filter_map(|(_, name)| env_name_from_object(project, name))
            .map(str::to_string)
            .collect();
        Ok(names)
    }

    fn exists(&self, bucket: &str, project: &str, environment: &str) -> Result<bool> {
        if self.state.borrow().failing_exists {
            return Err(EnvpullError::transport(
                "failed to check object existence",
                "simulated failure",
            ));
        }
        Ok(self.object(bucket, project, environment).is_some())
    }

    fn delete(&self, bucket: &str, project: &str, environment: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .objects
            .remove(&key(bucket, project, environment))
            .map(|_| ())
            .ok_or_else(|| not_found(bucket, project, environment))
    }

    fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        Ok(self.has_bucket(bucket))
    }

    fn create_bucket(&self, bucket: &str, _cloud_project: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .buckets
            .insert(normalize_bucket_name(bucket).to_string());
        Ok(())
    }
}
