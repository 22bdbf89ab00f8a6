//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use foundry_rules_config::ResolvedConnection;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::api::{ActionsApi, ObjectsApi};
use crate::error::{Error, Result};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Ontology REST API client.
///
/// # Example
///
/// ```no_run
/// use foundry_rules_client::FoundryClient;
/// use serde_json::json;
///
/// # async fn example() -> foundry_rules_client::Result<()> {
/// let client = FoundryClient::builder()
///     .base_url("https://stack.example.com")
///     .ontology_rid("ri.ontology.main.ontology.1")
///     .token("secret")
///     .build()?;
///
/// client
///     .actions()
///     .apply("approve-proposal", json!({"proposal_object": "PROP-1"}))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FoundryClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    /// Always ends with `/`.
    pub(crate) base_url: Url,
    pub(crate) ontology_rid: String,
    pub(crate) timeout: Duration,
}

impl FoundryClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from resolved connection settings.
    pub fn from_connection(connection: &ResolvedConnection) -> Result<Self> {
        Self::builder()
            .base_url(&connection.url)
            .ontology_rid(&connection.ontology_rid)
            .token(&connection.token)
            .build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the ontology identifier requests are scoped to.
    pub fn ontology_rid(&self) -> &str {
        &self.inner.ontology_rid
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the actions API.
    pub fn actions(&self) -> ActionsApi {
        ActionsApi::new(self.clone())
    }

    /// Access the objects API.
    pub fn objects(&self) -> ObjectsApi {
        ObjectsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build an ontology-scoped URL; each segment is percent-encoded.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["api", "v2", "ontologies", self.inner.ontology_rid.as_str()])
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request; `None` on 404.
    pub(crate) async fn get_optional<Q>(&self, url: Url, query: &Q) -> Result<Option<Value>>
    where
        Q: serde::Serialize + ?Sized,
    {
        let response = self
            .inner
            .http
            .get(url)
            .query(query)
            .timeout(self.inner.timeout)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Make a POST request.
    pub(crate) async fn post<B>(&self, url: Url, body: &B) -> Result<Value>
    where
        B: serde::Serialize + ?Sized,
    {
        let response = self
            .inner
            .http
            .post(url)
            .json(body)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle a response; an empty success body reads as `{}`.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Builder for creating a FoundryClient.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    ontology_rid: Option<String>,
    token: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            ontology_rid: None,
            token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the platform base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the ontology every request is scoped to.
    pub fn ontology_rid(mut self, rid: impl Into<String>) -> Self {
        self.ontology_rid = Some(rid.into());
        self
    }

    /// Set the bearer token. All whitespace is removed, including inner
    /// newlines left by copy-paste.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<FoundryClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;
        let ontology_rid = self
            .ontology_rid
            .filter(|rid| !rid.is_empty())
            .ok_or_else(|| Error::Config("ontology_rid is required".to_string()))?;
        let token: String = self
            .token
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .collect();
        if token.is_empty() {
            return Err(Error::Config("bearer token is not set".to_string()));
        }

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Config("Invalid bearer token".to_string()))?;
        headers.insert(AUTHORIZATION, auth);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("foundry-rules/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(FoundryClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                ontology_rid,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ClientBuilder {
        ClientBuilder::new()
            .base_url("https://stack.example.com")
            .ontology_rid("ri.ontology.main.ontology.1")
            .token("tok")
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new()
            .ontology_rid("ri.ontology")
            .token("tok")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_requires_token() {
        let result = builder().token(" \n\t ").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = builder().base_url("https://stack.example.com/").build().unwrap();
        assert_eq!(client.base_url().as_str(), "https://stack.example.com/");
    }

    #[test]
    fn test_url_building() {
        let client = builder().build().unwrap();
        let url = client.url(&["actions", "approve-proposal", "apply"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://stack.example.com/api/v2/ontologies/ri.ontology.main.ontology.1/actions/approve-proposal/apply"
        );

        let url = client.url(&["objectTypes", "rule", "objects", "a/b"]).unwrap();
        assert!(url.as_str().ends_with("/objectTypes/rule/objects/a%2Fb"));
    }

    #[test]
    fn test_url_building_with_base_path() {
        let client = builder().base_url("https://proxy.example.com/foundry").build().unwrap();
        let url = client.url(&["actions", "x", "apply"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.example.com/foundry/api/v2/ontologies/ri.ontology.main.ontology.1/actions/x/apply"
        );
    }
}
