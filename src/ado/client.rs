//! Authenticated request builder for the Azure DevOps REST API.
//!
//! Every call is addressed as
//! `{base_url}/{collection}[/{project}[/{team}]]/_apis/{path}` and carries the
//! pinned `api-version` query parameter plus a Basic authentication header
//! derived from the personal access token.

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{
    Method,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{AdoError, AdoResult};
use super::patch::PatchOperation;
use crate::core::config::AdoConfig;

const APPLICATION_JSON: &str = "application/json";
const APPLICATION_JSON_PATCH: &str = "application/json-patch+json";

/// Which addressing scope a resource path lives under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    /// `{collection}/{project}/_apis/...` (the default).
    #[default]
    Project,
    /// `{collection}/_apis/...`, for endpoints such as the project list.
    Collection,
    /// `{collection}/{project}/{team}/_apis/...`, for team settings endpoints.
    Team(String),
}

impl Scope {
    /// Team scope when a team is given, project scope otherwise.
    pub fn team_or_project(team: Option<&str>) -> Self {
        match team {
            Some(team) => Self::Team(team.to_string()),
            None => Self::Project,
        }
    }
}

/// Per-call options for [`AdoClient::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Extra headers; these override the client defaults.
    pub headers: HeaderMap,
    pub scope: Scope,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn patch(body: Value) -> Self {
        Self {
            method: Method::PATCH,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Client for one collection/project pair of an Azure DevOps instance.
///
/// Holds only immutable configuration, so a single instance can be shared
/// behind an `Arc` by every tool route.
#[derive(Clone)]
pub struct AdoClient {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    project: String,
    api_version: String,
    auth_header: String,
}

impl std::fmt::Debug for AdoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdoClient")
            .field("base_url", &self.base_url)
            .field("collection", &self.collection)
            .field("project", &self.project)
            .field("api_version", &self.api_version)
            .field("auth_header", &"[REDACTED]")
            .finish()
    }
}

impl AdoClient {
    /// Build a client from the Azure DevOps settings. Performs no I/O.
    pub fn new(config: &AdoConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            project: config.project.clone(),
            api_version: config.api_version.clone(),
            auth_header: basic_auth_header(&config.pat),
        }
    }

    /// The default project every project-scoped call targets.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Base URL with trailing slashes removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The precomputed `Authorization` header value.
    pub fn auth_header(&self) -> &str {
        &self.auth_header
    }

    /// Full address of `path` under `scope`, including `api-version`.
    pub fn url(&self, path: &str, scope: &Scope) -> String {
        let scope_segment = match scope {
            Scope::Project => format!("/{}", self.project),
            Scope::Collection => String::new(),
            Scope::Team(team) => format!("/{}/{}", self.project, urlencoding::encode(team)),
        };
        let separator = if path.contains('?') { '&' } else { '?' };
        format!(
            "{}/{}{}/_apis/{}{}api-version={}",
            self.base_url, self.collection, scope_segment, path, separator, self.api_version
        )
    }

    /// Perform a request and parse the JSON response.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> AdoResult<T> {
        let body = options.body.as_ref().map(serde_json::to_vec).transpose()?;
        self.send(
            path,
            options.method,
            APPLICATION_JSON,
            &options.headers,
            body,
            &options.scope,
        )
        .await
    }

    /// Perform a JSON Patch request.
    ///
    /// The method is always PATCH and the content type defaults to
    /// `application/json-patch+json`; `options.method` and `options.body`
    /// are ignored.
    pub async fn request_patch<T: DeserializeOwned>(
        &self,
        path: &str,
        operations: &[PatchOperation],
        options: RequestOptions,
    ) -> AdoResult<T> {
        let body = serde_json::to_vec(operations)?;
        self.send(
            path,
            Method::PATCH,
            APPLICATION_JSON_PATCH,
            &options.headers,
            Some(body),
            &options.scope,
        )
        .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        content_type: &'static str,
        overrides: &HeaderMap,
        body: Option<Vec<u8>>,
        scope: &Scope,
    ) -> AdoResult<T> {
        let url = self.url(path, scope);
        let headers = self.headers(content_type, overrides)?;

        debug!(%method, %url, "Sending Azure DevOps request");

        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            warn!(status = status.as_u16(), %url, "Azure DevOps request failed");
            return Err(AdoError::api(status, body));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    fn headers(&self, content_type: &'static str, overrides: &HeaderMap) -> AdoResult<HeaderMap> {
        let mut auth = HeaderValue::from_str(&self.auth_header)
            .map_err(|e| AdoError::InvalidHeader(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        for (name, value) in overrides {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }
}

/// `Basic base64(":" + token)`, the PAT form of HTTP Basic auth.
pub fn basic_auth_header(pat: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!(":{pat}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ado::patch::PatchOp;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    fn config(base_url: &str) -> AdoConfig {
        AdoConfig {
            base_url: base_url.to_string(),
            collection: "DefaultCollection".to_string(),
            pat: "abc123".to_string(),
            project: "Proj".to_string(),
            api_version: "7.0".to_string(),
        }
    }

    #[test]
    fn test_trailing_slashes_stripped() {
        for base in ["https://dev.example.com", "https://dev.example.com/", "https://dev.example.com///"] {
            let client = AdoClient::new(&config(base));
            assert_eq!(client.base_url(), "https://dev.example.com");
        }
    }

    #[test]
    fn test_auth_header_scenario() {
        let client = AdoClient::new(&config("https://dev.example.com"));
        assert_eq!(client.auth_header(), "Basic OmFiYzEyMw==");
    }

    #[test]
    fn test_url_with_existing_query() {
        let client = AdoClient::new(&config("https://dev.example.com/"));
        assert_eq!(
            client.url("wit/workitems/42?$expand=all", &Scope::Project),
            "https://dev.example.com/DefaultCollection/Proj/_apis/wit/workitems/42?$expand=all&api-version=7.0"
        );
    }

    #[test]
    fn test_url_without_query() {
        let client = AdoClient::new(&config("https://dev.example.com"));
        assert_eq!(
            client.url("git/repositories", &Scope::Project),
            "https://dev.example.com/DefaultCollection/Proj/_apis/git/repositories?api-version=7.0"
        );
    }

    #[test]
    fn test_url_collection_scope_omits_project() {
        let client = AdoClient::new(&config("https://dev.example.com"));
        let url = client.url("projects", &Scope::Collection);
        assert_eq!(
            url,
            "https://dev.example.com/DefaultCollection/_apis/projects?api-version=7.0"
        );
        assert!(!url.contains("/Proj/_apis/"));
    }

    #[test]
    fn test_url_team_scope() {
        let client = AdoClient::new(&config("https://dev.example.com"));
        assert_eq!(
            client.url("work/teamsettings/iterations", &Scope::Team("Core Team".to_string())),
            "https://dev.example.com/DefaultCollection/Proj/Core%20Team/_apis/work/teamsettings/iterations?api-version=7.0"
        );
    }

    #[test]
    fn test_debug_redacts_auth() {
        let client = AdoClient::new(&config("https://dev.example.com"));
        let debug = format!("{:?}", client);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("OmFiYzEyMw=="));
    }

    #[tokio::test]
    async fn test_request_sends_auth_and_api_version() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/DefaultCollection/Proj/_apis/git/repositories"))
            .and(query_param("api-version", "7.0"))
            .and(header("authorization", "Basic OmFiYzEyMw=="))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 1, "value": [{ "name": "repo" }] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AdoClient::new(&config(&server.uri()));
        let value: Value = tokio_test::assert_ok!(
            client.request("git/repositories", RequestOptions::get()).await
        );
        assert_eq!(value["value"][0]["name"], "repo");
    }

    #[tokio::test]
    async fn test_request_caller_headers_override_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/DefaultCollection/_apis/projects"))
            .and(header("content-type", "text/plain"))
            .and(header("authorization", "Bearer other"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = AdoClient::new(&config(&server.uri()));
        let options = RequestOptions::post(json!({}))
            .with_scope(Scope::Collection)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer other"));
        let result: AdoResult<Value> = client.request("projects", options).await;
        tokio_test::assert_ok!(result);
    }

    #[tokio::test]
    async fn test_request_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("TF401232: Work item 42 does not exist"))
            .mount(&server)
            .await;

        let client = AdoClient::new(&config(&server.uri()));
        let err = tokio_test::assert_err!(
            client.request::<Value>("wit/workitems/42", RequestOptions::get()).await
        );
        match err {
            AdoError::Api { status, status_text, body } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
                assert_eq!(body, "TF401232: Work item 42 does not exist");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_non_json_success_is_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>sign in</html>"))
            .mount(&server)
            .await;

        let client = AdoClient::new(&config(&server.uri()));
        let err = client
            .request::<Value>("projects", RequestOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, AdoError::Json(_)));
    }

    #[tokio::test]
    async fn test_request_patch_content_type_and_body() {
        let operations = vec![
            PatchOperation::add_field("System.Title", "New title"),
            PatchOperation::new(PatchOp::Test, "/rev", json!(3)),
        ];

        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/DefaultCollection/Proj/_apis/wit/workitems/42"))
            .and(header("content-type", "application/json-patch+json"))
            .and(body_json(json!([
                { "op": "add", "path": "/fields/System.Title", "value": "New title" },
                { "op": "test", "path": "/rev", "value": 3 }
            ])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AdoClient::new(&config(&server.uri()));
        let item: Value = client
            .request_patch("wit/workitems/42", &operations, RequestOptions::get())
            .await
            .unwrap();
        assert_eq!(item["id"], 42);
    }

    #[tokio::test]
    async fn test_request_patch_caller_may_override_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = AdoClient::new(&config(&server.uri()));
        let options = RequestOptions::get()
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let result: AdoResult<Value> = client.request_patch("wit/workitems/1", &[], options).await;
        assert!(result.is_ok());
    }
}
