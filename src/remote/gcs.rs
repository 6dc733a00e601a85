//! Google Cloud Storage backend.
//!
//! Talks to the Cloud Storage JSON API over blocking HTTP. Requests carry a
//! bearer token fetched once, on the first remote call. There is no retry
//! layer and no client-side timeout: a failed call is reported as is.

use std::cell::OnceCell;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use super::{env_name_from_object, normalize_bucket_name, object_path, project_prefix};
use super::RemoteObjectStore;
use crate::error::{EnvpullError, Result};

/// Public Cloud Storage endpoint.
pub const DEFAULT_STORAGE_URL: &str = "https://storage.googleapis.com";

/// Supplies OAuth access tokens for storage requests.
pub trait TokenProvider {
    fn access_token(&self) -> Result<String>;
}

/// A token given up front, e.g. from `ENVPULL_ACCESS_TOKEN`.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectList {
    #[serde(default)]
    items: Vec<ObjectItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectItem {
    name: String,
}

/// [`RemoteObjectStore`] backed by Cloud Storage.
pub struct GcsStore {
    client: Client,
    base_url: Url,
    tokens: Box<dyn TokenProvider>,
    token: OnceCell<String>,
}

impl GcsStore {
    /// Create a store talking to `base_url`.
    pub fn new(base_url: &str, tokens: Box<dyn TokenProvider>) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| EnvpullError::ConfigValidationError {
            message: format!("invalid storage URL '{}': {}", base_url, e),
        })?;
        let client = Client::builder()
            .timeout(None::<Duration>)
            .user_agent(concat!("envpull/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EnvpullError::transport("failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url,
            tokens,
            token: OnceCell::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn token(&self) -> Result<String> {
        if let Some(token) = self.token.get() {
            return Ok(token.clone());
        }
        let fetched = self.tokens.access_token()?;
        Ok(self.token.get_or_init(|| fetched).clone())
    }

    /// Build an endpoint URL. Each segment is percent-encoded, so object
    /// names keep their `/` as `%2F`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EnvpullError::ConfigValidationError {
                message: format!("invalid storage URL '{}'", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn object_url(&self, bucket: &str, project: &str, environment: &str) -> Result<Url> {
        let object = object_path(project, environment);
        self.endpoint(&["storage", "v1", "b", normalize_bucket_name(bucket), "o", &object])
    }

    fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        let token = self.token()?;
        request
            .bearer_auth(token)
            .send()
            .map_err(|e| EnvpullError::transport(context, e))
    }
}

/// Turn a non-success response into a transport error.
fn check(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let mut message = format!("HTTP {}", status);
    if !body.trim().is_empty() {
        message.push_str(": ");
        message.push_str(body.trim());
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        message.push_str("\n\nTry running: envpull login");
    }
    Err(EnvpullError::transport(context, message))
}

impl RemoteObjectStore for GcsStore {
    fn get(&self, bucket: &str, project: &str, environment: &str) -> Result<Vec<u8>> {
        let mut url = self.object_url(bucket, project, environment)?;
        url.query_pairs_mut().append_pair("alt", "media");
        tracing::debug!(%url, "Downloading env object");

        let response = self.send(self.client.get(url), "failed to read from storage")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(EnvpullError::RemoteObjectNotFound {
                environment: environment.to_string(),
                bucket: normalize_bucket_name(bucket).to_string(),
                project: project.to_string(),
            });
        }
        let response = check(response, "failed to read from storage")?;
        let bytes = response
            .bytes()
            .map_err(|e| EnvpullError::transport("failed to read data", e))?;
        Ok(bytes.to_vec())
    }

    fn put(&self, bucket: &str, project: &str, environment: &str, data: &[u8]) -> Result<()> {
        let mut url = self.endpoint(&[
            "upload",
            "storage",
            "v1",
            "b",
            normalize_bucket_name(bucket),
            "o",
        ])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", &object_path(project, environment));
        tracing::debug!(%url, bytes = data.len(), "Uploading env object");

        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(data.to_vec());
        let response = self.send(request, "failed to write to storage")?;
        check(response, "failed to write to storage")?;
        Ok(())
    }

    fn list(&self, bucket: &str, project: &str) -> Result<Vec<String>> {
        let prefix = project_prefix(project);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url =
                self.endpoint(&["storage", "v1", "b", normalize_bucket_name(bucket), "o"])?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("prefix", &prefix);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }
            tracing::debug!(%url, "Listing env objects");

            let response = self.send(self.client.get(url), "failed to list objects")?;
            let page: ObjectList = check(response, "failed to list objects")?
                .json()
                .map_err(|e| EnvpullError::transport("failed to decode object list", e))?;

            names.extend(
                page.items
                    .iter()
                    .filter_map(|item| env_name_from_object(project, &item.name))
                    .map(str::to_string),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    fn exists(&self, bucket: &str, project: &str, environment: &str) -> Result<bool> {
        let url = self.object_url(bucket, project, environment)?;
        let response = self.send(self.client.get(url), "failed to check object existence")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check(response, "failed to check object existence")?;
        Ok(true)
    }

    fn delete(&self, bucket: &str, project: &str, environment: &str) -> Result<()> {
        let url = self.object_url(bucket, project, environment)?;
        let response = self.send(self.client.delete(url), "failed to delete from storage")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(EnvpullError::RemoteObjectNotFound {
                environment: environment.to_string(),
                bucket: normalize_bucket_name(bucket).to_string(),
                project: project.to_string(),
            });
        }
        check(response, "failed to delete from storage")?;
        Ok(())
    }

    fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let url = self.endpoint(&["storage", "v1", "b", normalize_bucket_name(bucket)])?;
        let response = self.send(self.client.get(url), "failed to check bucket")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check(response, "failed to check bucket")?;
        Ok(true)
    }

    fn create_bucket(&self, bucket: &str, cloud_project: &str) -> Result<()> {
        let mut url = self.endpoint(&["storage", "v1", "b"])?;
        url.query_pairs_mut().append_pair("project", cloud_project);
        let body = serde_json::json!({ "name": normalize_bucket_name(bucket) });
        tracing::info!(bucket = normalize_bucket_name(bucket), "Creating bucket");

        let response = self.send(self.client.post(url).json(&body), "failed to create bucket")?;
        check(response, "failed to create bucket")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn store(server: &MockServer) -> GcsStore {
        GcsStore::new(&server.base_url(), Box::new(StaticToken("test-token".into()))).unwrap()
    }

    struct CountingToken(Rc<Cell<usize>>);

    impl TokenProvider for CountingToken {
        fn access_token(&self) -> Result<String> {
            self.0.set(self.0.get() + 1);
            Ok("counted".into())
        }
    }

    /// Fails on the first call, then hands out a token.
    struct FlakyToken(Rc<Cell<usize>>);

    impl TokenProvider for FlakyToken {
        fn access_token(&self) -> Result<String> {
            self.0.set(self.0.get() + 1);
            if self.0.get() == 1 {
                return Err(EnvpullError::GcloudMissing);
            }
            Ok("second".into())
        }
    }

    struct FailingToken;

    impl TokenProvider for FailingToken {
        fn access_token(&self) -> Result<String> {
            Err(EnvpullError::CommandFailed {
                command: "gcloud auth application-default print-access-token".into(),
                code: Some(1),
            })
        }
    }

    #[test]
    fn object_url_encodes_object_name() {
        let store = GcsStore::new(DEFAULT_STORAGE_URL, Box::new(StaticToken("t".into()))).unwrap();

        let url = store.object_url("gs://my-envs/", "api", "prod").unwrap();

        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/storage/v1/b/my-envs/o/api%2Fprod.env"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GcsStore::new("not a url", Box::new(StaticToken("t".into())));
        assert!(matches!(
            result,
            Err(EnvpullError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn get_returns_object_bytes() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path_prefix("/storage/v1/b/my-envs/o/")
                .path_suffix("default.env")
                .query_param("alt", "media")
                .header("authorization", "Bearer test-token");
            then.status(200).body("API_KEY=secret\n");
        });

        let data = store(&server).get("gs://my-envs", "api", "default").unwrap();

        assert_eq!(data, b"API_KEY=secret\n");
        mock.assert();
    }

    #[test]
    fn get_missing_object_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_prefix("/storage/v1/b/my-envs/o/");
            then.status(404).body("No such object");
        });

        let err = store(&server).get("my-envs", "api", "prod").unwrap_err();

        match err {
            EnvpullError::RemoteObjectNotFound {
                environment,
                bucket,
                project,
            } => {
                assert_eq!(environment, "prod");
                assert_eq!(bucket, "my-envs");
                assert_eq!(project, "api");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn server_error_is_transport_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_prefix("/storage/v1/b/my-envs/o/");
            then.status(500).body("backend error");
        });

        let err = store(&server).get("my-envs", "api", "prod").unwrap_err();

        assert!(matches!(err, EnvpullError::RemoteTransportFailure { .. }));
        assert!(err.to_string().contains("500"), "{}", err);
    }

    #[test]
    fn forbidden_suggests_login() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_prefix("/storage/v1/b/my-envs/o/");
            then.status(403).body("denied");
        });

        let err = store(&server).get("my-envs", "api", "prod").unwrap_err();

        assert!(err.to_string().contains("envpull login"));
    }

    #[test]
    fn put_uploads_media() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/upload/storage/v1/b/my-envs/o")
                .query_param("uploadType", "media")
                .query_param("name", "api/develop.env")
                .header("content-type", "text/plain")
                .body("A=1\n");
            then.status(200).json_body(serde_json::json!({ "name": "api/develop.env" }));
        });

        store(&server)
            .put("gs://my-envs", "api", "develop", b"A=1\n")
            .unwrap();

        mock.assert();
    }

    #[test]
    fn list_filters_and_sorts_names() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/storage/v1/b/my-envs/o")
                .query_param("prefix", "api/");
            then.status(200).json_body(serde_json::json!({
                "items": [
                    { "name": "api/prod.env" },
                    { "name": "api/default.env" },
                    { "name": "api/archive/old.env" },
                    { "name": "api/README.md" },
                    { "name": "api/.env" }
                ]
            }));
        });

        let names = store(&server).list("my-envs", "api").unwrap();

        assert_eq!(names, vec!["default", "prod"]);
    }

    #[test]
    fn list_follows_page_tokens() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/storage/v1/b/my-envs/o")
                .query_param_missing("pageToken");
            then.status(200).json_body(serde_json::json!({
                "items": [{ "name": "api/staging.env" }],
                "nextPageToken": "page-2"
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/storage/v1/b/my-envs/o")
                .query_param("pageToken", "page-2");
            then.status(200).json_body(serde_json::json!({
                "items": [{ "name": "api/default.env" }]
            }));
        });

        let names = store(&server).list("my-envs", "api").unwrap();

        assert_eq!(names, vec!["default", "staging"]);
        first.assert();
        second.assert();
    }

    #[test]
    fn list_with_no_items_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/storage/v1/b/my-envs/o");
            then.status(200).json_body(serde_json::json!({ "kind": "storage#objects" }));
        });

        assert!(store(&server).list("my-envs", "api").unwrap().is_empty());
    }

    #[test]
    fn exists_maps_404_to_false() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_prefix("/storage/v1/b/my-envs/o/");
            then.status(404);
        });

        assert!(!store(&server).exists("my-envs", "api", "prod").unwrap());
    }

    #[test]
    fn exists_true_for_metadata_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_prefix("/storage/v1/b/my-envs/o/");
            then.status(200).json_body(serde_json::json!({ "name": "api/prod.env" }));
        });

        assert!(store(&server).exists("my-envs", "api", "prod").unwrap());
    }

    #[test]
    fn delete_missing_object_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path_prefix("/storage/v1/b/my-envs/o/");
            then.status(404);
        });

        let err = store(&server).delete("my-envs", "api", "prod").unwrap_err();

        assert!(matches!(err, EnvpullError::RemoteObjectNotFound { .. }));
    }

    #[test]
    fn bucket_exists_checks_metadata() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/storage/v1/b/my-envs");
            then.status(200).json_body(serde_json::json!({ "name": "my-envs" }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/storage/v1/b/missing");
            then.status(404);
        });

        let store = store(&server);

        assert!(store.bucket_exists("gs://my-envs").unwrap());
        assert!(!store.bucket_exists("missing").unwrap());
    }

    #[test]
    fn create_bucket_posts_name() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/storage/v1/b")
                .query_param("project", "my-gcp")
                .json_body(serde_json::json!({ "name": "new-envs" }));
            then.status(200).json_body(serde_json::json!({ "name": "new-envs" }));
        });

        store(&server).create_bucket("gs://new-envs", "my-gcp").unwrap();

        mock.assert();
    }

    #[test]
    fn token_is_fetched_once() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/storage/v1/b/my-envs");
            then.status(200);
        });
        let calls = Rc::new(Cell::new(0));
        let store = GcsStore::new(&server.base_url(), Box::new(CountingToken(calls.clone()))).unwrap();

        store.bucket_exists("my-envs").unwrap();
        store.bucket_exists("my-envs").unwrap();

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn token_failure_stops_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/storage/v1/b/my-envs");
            then.status(200);
        });
        let store = GcsStore::new(&server.base_url(), Box::new(FailingToken)).unwrap();

        let err = store.bucket_exists("my-envs").unwrap_err();

        assert!(matches!(err, EnvpullError::CommandFailed { .. }));
        mock.assert_calls(0);
    }

    #[test]
    fn failed_token_fetch_is_not_cached() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/storage/v1/b/my-envs")
                .header("authorization", "Bearer second");
            then.status(200);
        });
        let calls = Rc::new(Cell::new(0));
        let store = GcsStore::new(&server.base_url(), Box::new(FlakyToken(calls.clone()))).unwrap();

        assert!(store.bucket_exists("my-envs").is_err());
        assert!(store.bucket_exists("my-envs").unwrap());
        assert!(store.bucket_exists("my-envs").unwrap());

        assert_eq!(calls.get(), 2);
        mock.assert_calls(2);
    }
}
