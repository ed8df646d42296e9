//! Authenticated request client for the anny REST API.
//!
//! One [`AnnyClient`] is built per execution from a resolved
//! [`AuthContext`]. It owns base-URL resolution, organization scoping,
//! content negotiation and the translation of remote error bodies into a
//! single human-readable message.

use annyflow_core::normalize_response;
use annyflow_domain::constants::{JSON_API_MEDIA_TYPE, JSON_MEDIA_TYPE};
use annyflow_domain::{AnnyflowError, AuthContext, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

/// Content-negotiation mode for one side of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// `application/vnd.api+json`; responses in this mode are decoded
    /// through the JSON:API codec.
    JsonApi,
    /// `application/json`; response bodies pass through as-is.
    Json,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JsonApi => JSON_API_MEDIA_TYPE,
            Self::Json => JSON_MEDIA_TYPE,
        }
    }
}

/// One outbound API call.
///
/// Defaults match the JSON:API write convention of the remote platform:
/// `Content-Type: application/vnd.api+json`, `Accept: application/json`.
/// Availability endpoints override both to plain JSON.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    headers: Vec<(String, String)>,
    accept: MediaType,
    content_type: MediaType,
}

impl RequestOptions {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
            accept: MediaType::Json,
            content_type: MediaType::JsonApi,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, params: Vec<(String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a body. Empty objects are treated as no body.
    pub fn body(mut self, body: Value) -> Self {
        let empty = body.as_object().is_some_and(serde_json::Map::is_empty) || body.is_null();
        self.body = (!empty).then_some(body);
        self
    }

    /// Extra header; caller-supplied headers win over the defaults.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn accept(mut self, accept: MediaType) -> Self {
        self.accept = accept;
        self
    }

    pub fn content_type(mut self, content_type: MediaType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Plain-JSON negotiation on both sides (non-JSON:API endpoints).
    pub fn plain_json(self) -> Self {
        self.accept(MediaType::Json).content_type(MediaType::Json)
    }
}

/// Authenticated client bound to one credential set and region.
#[derive(Clone)]
pub struct AnnyClient {
    http: HttpClient,
    auth: AuthContext,
    base_url: String,
}

impl AnnyClient {
    /// Build a client for the credential's region.
    pub fn new(auth: AuthContext) -> Result<Self> {
        let base_url = auth.region().base_url().to_string();
        Self::with_base_url(auth, base_url)
    }

    /// Build a client against an explicit origin (tests, self-hosted
    /// deployments).
    pub fn with_base_url(auth: AuthContext, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self { http: HttpClient::new()?, auth, base_url: base_url.into() })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Issue one call and return the raw JSON body.
    ///
    /// Non-2xx responses are flattened into [`AnnyflowError::Api`] with a
    /// message built from the remote error body (JSON:API `errors[]`, then
    /// `{error}`, then `{title, message}`, then the raw body).
    pub async fn execute(&self, options: RequestOptions) -> Result<Value> {
        let url = self.build_url(&options.path)?;
        let token = self.auth.bearer_token()?;

        let mut query = options.query;
        if let Some(org_id) = self.auth.organization_id() {
            query.push(("o".to_string(), org_id.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, static_header(options.content_type.as_str()));
        headers.insert(ACCEPT, static_header(options.accept.as_str()));
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| AnnyflowError::InvalidInput(format!("bad header name: {err}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| AnnyflowError::InvalidInput(format!("bad header value: {err}")))?;
            headers.insert(name, value);
        }

        let mut request = self
            .http
            .request(options.method.clone(), url)
            .query(&query)
            .headers(headers)
            .bearer_auth(token);

        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| AnnyflowError::Network(format!("failed to read response: {err}")))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), path = %options.path, "remote call failed");
            return Err(AnnyflowError::Api(translate_error(status.as_u16(), &text)));
        }

        if text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&text)
            .map_err(|err| AnnyflowError::Internal(format!("malformed response body: {err}")))
    }

    /// Issue one call and shape the body according to the accept mode:
    /// JSON:API responses are decoded into normalized records, plain JSON
    /// passes through. The accept flag is the single source of truth for
    /// the expected response shape.
    pub async fn fetch(&self, options: RequestOptions) -> Result<Value> {
        let accept = options.accept;
        let body = self.execute(options).await?;
        Ok(match accept {
            MediaType::JsonApi => normalize_response(body),
            MediaType::Json => body,
        })
    }

    /// Lightweight credential check: fetch the authenticated user.
    pub async fn verify_credentials(&self) -> Result<Value> {
        self.execute(RequestOptions::get("/api/v1/user")).await
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .map_err(|err| AnnyflowError::Config(format!("invalid base url: {err}")))?;
        base.join(path).map_err(|err| AnnyflowError::Config(format!("invalid path: {err}")))
    }
}

fn static_header(value: &'static str) -> HeaderValue {
    HeaderValue::from_static(value)
}

/// Flatten a remote error body into one display message.
fn translate_error(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        if let Some(errors) = parsed.get("errors").and_then(Value::as_array) {
            let parts: Vec<String> = errors.iter().map(|entry| format_error_entry(status, entry)).collect();
            if !parts.is_empty() {
                return parts.join("; ");
            }
        }
        if let Some(error) = parsed.get("error").and_then(Value::as_str) {
            return format!("[{status}] {error}");
        }
        if let (Some(title), Some(message)) = (
            parsed.get("title").and_then(Value::as_str),
            parsed.get("message").and_then(Value::as_str),
        ) {
            return format!("[{status}] {title}: {message}");
        }
    }
    if body.trim().is_empty() {
        format!("[{status}] request failed")
    } else {
        format!("[{status}] {}", body.trim())
    }
}

fn format_error_entry(status: u16, entry: &Value) -> String {
    let entry_status = entry
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());
    let title = entry.get("title").and_then(Value::as_str).unwrap_or("Error");
    match entry.get("detail").and_then(Value::as_str) {
        Some(detail) => format!("[{entry_status}] {title}: {detail}"),
        None => format!("[{entry_status}] {title}"),
    }
}
