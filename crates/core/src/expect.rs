//! Assertions on [`ApiResponse`]s.
//!
//! Each check returns the response again so checks chain with `?`. A failed
//! check names the request, what was inspected and both values.
use serde_json::Value;

use crate::client::ApiResponse;
use crate::error::HarnessError;

const MISSING: &str = "<missing>";
const BODY_PREVIEW_CHARS: usize = 200;

fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= BODY_PREVIEW_CHARS {
        return text;
    }
    let cut: String = text.chars().take(BODY_PREVIEW_CHARS).collect();
    format!("{cut}...")
}

impl ApiResponse {
    fn failure(&self, context: String, expected: String, actual: String) -> HarnessError {
        HarnessError::Assertion {
            request: self.describe(),
            context,
            expected,
            actual,
        }
    }

    pub fn expect_status(&self, expected: u16) -> Result<&Self, HarnessError> {
        if self.status == expected {
            return Ok(self);
        }
        Err(self.failure(
            "status".to_string(),
            expected.to_string(),
            format!("{} with body {}", self.status, preview(&self.body)),
        ))
    }

    /// Compares the value at a JSON pointer. A missing value never matches,
    /// not even an expected `null`.
    pub fn expect_eq(&self, pointer: &str, expected: impl Into<Value>) -> Result<&Self, HarnessError> {
        let expected = expected.into();
        match self.json(pointer) {
            Some(actual) if *actual == expected => Ok(self),
            Some(actual) => Err(self.failure(
                pointer.to_string(),
                expected.to_string(),
                preview(actual),
            )),
            None => Err(self.failure(
                pointer.to_string(),
                expected.to_string(),
                MISSING.to_string(),
            )),
        }
    }

    pub fn expect_present(&self, pointer: &str) -> Result<&Self, HarnessError> {
        match self.json(pointer) {
            Some(_) => Ok(self),
            None => Err(self.failure(
                pointer.to_string(),
                "a value".to_string(),
                MISSING.to_string(),
            )),
        }
    }

    pub fn expect_len(&self, pointer: &str, expected: usize) -> Result<&Self, HarnessError> {
        match self.json(pointer).and_then(Value::as_array) {
            Some(items) if items.len() == expected => Ok(self),
            Some(items) => Err(self.failure(
                format!("length of {pointer}"),
                expected.to_string(),
                items.len().to_string(),
            )),
            None => Err(self.failure(
                pointer.to_string(),
                format!("an array of {expected}"),
                self.json(pointer).map_or_else(|| MISSING.to_string(), preview),
            )),
        }
    }

    /// Compares the error text found by [`ApiResponse::error_message`].
    pub fn expect_message(&self, expected: &str) -> Result<&Self, HarnessError> {
        match self.error_message() {
            Some(actual) if actual == expected => Ok(self),
            actual => Err(self.failure(
                "error message".to_string(),
                format!("{expected:?}"),
                actual.map_or_else(|| preview(&self.body), |m| format!("{m:?}")),
            )),
        }
    }

    /// Reads a string the scenario needs to continue, such as a token.
    pub fn require_str(&self, pointer: &str) -> Result<&str, HarnessError> {
        self.str_at(pointer).ok_or_else(|| {
            self.failure(
                pointer.to_string(),
                "a string".to_string(),
                self.json(pointer).map_or_else(|| MISSING.to_string(), preview),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use reqwest::header::HeaderMap;
    use serde_json::json;
    use url::Url;

    fn response(status: u16, body: Value) -> ApiResponse {
        ApiResponse {
            method: Method::GET,
            url: Url::parse("http://localhost:8000/api/profiles/alice").unwrap(),
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    #[test]
    fn test_checks_chain_on_success() {
        let response = response(
            200,
            json!({"profile": {"username": "alice", "bio": null, "following": false}}),
        );

        let result = response
            .expect_status(200)
            .and_then(|r| r.expect_eq("/profile/username", "alice"))
            .and_then(|r| r.expect_eq("/profile/bio", Value::Null))
            .and_then(|r| r.expect_eq("/profile/following", false))
            .and_then(|r| r.expect_present("/profile"));

        assert!(result.is_ok());
    }

    #[test]
    fn test_status_mismatch_reports_request_and_body() {
        let response = response(404, json!({"errors": {"profile": ["not found"]}}));

        let err = response.expect_status(200).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("GET http://localhost:8000/api/profiles/alice"));
        assert!(message.contains("expected 200"));
        assert!(message.contains("got 404"));
        assert!(message.contains("not found"));
    }

    #[test]
    fn test_missing_value_does_not_match_null() {
        let response = response(200, json!({"profile": {}}));

        let err = response.expect_eq("/profile/bio", Value::Null).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::Assertion { ref actual, .. } if actual == "<missing>"
        ));
    }

    #[test]
    fn test_expect_len() {
        let response = response(200, json!({"articles": [{"title": "a"}], "articlesCount": 1}));

        assert!(response.expect_len("/articles", 1).is_ok());
        let err = response.expect_len("/articles", 2).unwrap_err();
        assert!(err.to_string().contains("length of /articles"));
        assert!(response.expect_len("/articlesCount", 1).is_err());
    }

    #[test]
    fn test_expect_message() {
        let response = response(401, json!({"detail": [{"msg": "incorrect credentials"}]}));

        assert!(response.expect_message("incorrect credentials").is_ok());
        let err = response.expect_message("forbidden").unwrap_err();
        assert!(err.to_string().contains("\"incorrect credentials\""));
    }

    #[test]
    fn test_require_str() {
        let response = response(201, json!({"user": {"token": "jwt", "bio": null}}));

        assert_eq!(response.require_str("/user/token").unwrap(), "jwt");
        assert!(response.require_str("/user/bio").is_err());
        assert!(response.require_str("/user/image").is_err());
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let response = response(500, json!("x".repeat(1000)));
        let err = response.expect_status(200).unwrap_err();
        assert!(err.to_string().ends_with("..."));
    }
}
