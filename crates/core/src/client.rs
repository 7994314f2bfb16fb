//! Thin HTTP helper over `reqwest` used by every scenario step.
use std::time::Instant;

use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::error::HarnessError;

/// A fully read response from the target API.
///
/// Any status code, including 4xx and 5xx, ends up here.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub method: Method,
    pub url: Url,
    pub status: u16,
    pub headers: HeaderMap,
    /// Parsed JSON, the raw text as a JSON string when the body is not JSON,
    /// or `Null` when the body is empty.
    pub body: Value,
}

impl ApiResponse {
    /// Looks up a value with a JSON pointer such as `/user/token`.
    pub fn json(&self, pointer: &str) -> Option<&Value> {
        self.body.pointer(pointer)
    }

    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.json(pointer).and_then(Value::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Human readable error carried by an error body.
    ///
    /// Understands the envelopes the API uses: `{"message": ..}`,
    /// `{"detail": [{"msg": .., "ctx": {"error": ..}}]}`, `{"detail": ".."}`
    /// and `{"errors": {"field": [..]}}`. A validation `ctx.error` wins over
    /// `msg`, which carries a `Value error, ` prefix.
    pub fn error_message(&self) -> Option<&str> {
        let body = &self.body;
        body.get("message")
            .and_then(Value::as_str)
            .or_else(|| body.pointer("/detail/0/ctx/error").and_then(Value::as_str))
            .or_else(|| body.pointer("/detail/0/msg").and_then(Value::as_str))
            .or_else(|| body.get("detail").and_then(Value::as_str))
            .or_else(|| {
                body.get("errors")
                    .and_then(Value::as_object)
                    .and_then(|errors| {
                        errors
                            .values()
                            .find_map(|messages| messages.pointer("/0").and_then(Value::as_str))
                    })
            })
    }

    /// `METHOD url`, used to label diagnostics.
    pub fn describe(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Sends requests to the API under test.
///
/// Cloning is cheap, clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    auth_scheme: String,
    client: Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, HarnessError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| HarnessError::Transport {
                method: "BUILD".to_string(),
                url: config.base_url.to_string(),
                source,
            })?;
        Ok(Self {
            base_url: config.base_url.clone(),
            auth_scheme: config.auth_scheme.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base url, keeping any path the base has.
    pub fn url(&self, path: &str) -> Result<Url, HarnessError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(|e| HarnessError::InvalidPath {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    #[instrument(skip(self, body, token))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<ApiResponse, HarnessError> {
        let url = self.url(path)?;
        let mut builder = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("{} {}", self.auth_scheme, token));
        }

        debug!(%method, %url, authenticated = token.is_some(), "Sending request");
        let started = Instant::now();
        let transport = |source: reqwest::Error| {
            warn!(%method, %url, error = %source, "Transport failure");
            HarnessError::Transport {
                method: method.to_string(),
                url: url.to_string(),
                source,
            }
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(transport)?;
        debug!(
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Received response"
        );

        Ok(ApiResponse {
            method,
            url,
            status,
            headers,
            body: parse_body(&text),
        })
    }

    pub async fn post(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<ApiResponse, HarnessError> {
        self.request(Method::POST, path, Some(body), token).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<ApiResponse, HarnessError> {
        self.request(Method::GET, path, None, token).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<ApiResponse, HarnessError> {
        self.request(Method::PUT, path, Some(body), token).await
    }

    pub async fn delete(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<ApiResponse, HarnessError> {
        self.request(Method::DELETE, path, None, token).await
    }
}
