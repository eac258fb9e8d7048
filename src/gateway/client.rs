//! HTTP gateway shared by the VK and Yandex Disk clients.
//!
//! [`HttpGateway`] owns one pooled `reqwest::Client` bound to a base URL.
//! Callers describe each call with an [`ApiRequest`]; the gateway joins the
//! path onto the base URL, attaches query pairs and headers, and turns any
//! status of 400 or above into [`ApiError::HttpStatus`]. A request may opt in
//! to treating `409 Conflict` as success, which is how "create if missing"
//! calls report that the resource already exists.

use std::time::Duration;

use reqwest::header::HeaderName;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::error::ApiError;
use crate::user_agent;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Status code tolerated by requests built with [`ApiRequest::tolerate_conflict`].
pub const CONFLICT: u16 = 409;

/// Description of a single API call relative to a gateway's base URL.
#[derive(Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(HeaderName, String)>,
    body: Option<serde_json::Value>,
    tolerate_conflict: bool,
}

impl ApiRequest {
    /// Creates a request with an arbitrary method.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            tolerate_conflict: false,
        }
    }

    /// Creates a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a `PUT` request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Appends a query parameter. Values are percent-encoded when sent.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Sets a JSON request body.
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Treats `409 Conflict` as a successful response.
    #[must_use]
    pub fn tolerate_conflict(mut self) -> Self {
        self.tolerate_conflict = true;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path relative to the gateway base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

// Query values and headers carry access tokens, so only their keys are shown.
impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let query_keys: Vec<&str> = self.query.iter().map(|(key, _)| key.as_str()).collect();
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query_keys", &query_keys)
            .field("headers", &header_names)
            .field("has_body", &self.body.is_some())
            .field("tolerate_conflict", &self.tolerate_conflict)
            .finish()
    }
}

/// HTTP client bound to one API base URL.
///
/// Created once per API and reused for every call, taking advantage of
/// connection pooling.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a gateway for `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeouts(base_url, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a gateway with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn with_timeouts(
        base_url: impl Into<String>,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(user_agent::default_user_agent())
            .gzip(true)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Returns the base URL every request path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the full URL for `path` with `query` pairs appended.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the joined URL does not parse.
    pub fn endpoint_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        let joined = join_url(&self.base_url, path);
        let mut url = Url::parse(&joined).map_err(|_| ApiError::invalid_url(&joined))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Sends a request and returns the raw response.
    ///
    /// The response is returned for any status below 400, and for `409` when
    /// the request tolerates conflicts, so callers can inspect the status.
    ///
    /// # Errors
    ///
    /// - [`ApiError::HttpStatus`] for a non-tolerated status of 400 or above
    /// - [`ApiError::Timeout`] / [`ApiError::Network`] for transport failures
    /// - [`ApiError::InvalidUrl`] if the endpoint URL is malformed
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let url = self.endpoint_url(&request.path, &request.query)?;
        let endpoint = display_url(&url);

        let mut builder = self.client.request(request.method.clone(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.clone(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(url = %endpoint, "sending request");
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::timeout(&endpoint)
            } else {
                ApiError::network(&endpoint, e)
            }
        })?;

        let status = response.status().as_u16();
        if status >= 400 && !(status == CONFLICT && request.tolerate_conflict) {
            let body = response.text().await.unwrap_or_default();
            debug!(url = %endpoint, status, "request failed");
            return Err(ApiError::http_status(endpoint, status, body));
        }

        debug!(url = %endpoint, status, "request succeeded");
        Ok(response)
    }

    /// Sends a request and decodes the response body as JSON.
    ///
    /// # Errors
    ///
    /// Everything [`HttpGateway::send`] returns, plus [`ApiError::Decode`]
    /// when the body is not valid JSON of type `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let endpoint = display_url(response.url());
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::network(&endpoint, e))?;
        serde_json::from_str(&text).map_err(|source| ApiError::decode(endpoint, source))
    }
}

/// Joins a base URL and a relative path with exactly one slash between them.
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Renders a URL without its query string or fragment.
#[must_use]
pub fn display_url(url: &Url) -> String {
    let mut stripped = url.clone();
    stripped.set_query(None);
    stripped.set_fragment(None);
    stripped.to_string()
}
