use thiserror::Error;

use crate::config::ConfigError;

/// Failures that abort a scenario.
///
/// HTTP error statuses are not represented here: a 401 or 422 from the target
/// API is an ordinary [`crate::client::ApiResponse`].
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid request path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("assertion failed for {request}: {context}: expected {expected}, got {actual}")]
    Assertion {
        request: String,
        context: String,
        expected: String,
        actual: String,
    },
    #[error("alias '{0}' was read before it was captured")]
    MissingAlias(String),
    #[error("alias '{name}' does not hold {expected}")]
    AliasType { name: String, expected: String },
    #[error("Invalid spec pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HarnessError {
    pub fn is_transport(&self) -> bool {
        matches!(self, HarnessError::Transport { .. })
    }
}
