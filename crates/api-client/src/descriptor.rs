//! Request descriptors
//!
//! A [`RequestDescriptor`] is the declarative description of one call:
//! where it goes, what it carries and how it may be cancelled. The
//! dispatcher turns it into a concrete [`HttpRequest`](networking::HttpRequest).

use networking::HttpMethod;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// Declarative description of one HTTP call
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    /// Endpoint path relative to the API base URL
    pub endpoint: Option<String>,
    /// Absolute URL used verbatim instead of the endpoint
    pub external_url: Option<String>,
    /// JSON payload
    pub body: Option<Value>,
    /// Header overrides, applied after the dispatcher's own headers
    pub headers: Vec<(String, String)>,
    /// Explicit method; see [`RequestDescriptor::effective_method`]
    pub method: Option<HttpMethod>,
    /// Suffix appended after the endpoint path
    pub append_in_url: Option<String>,
    /// Query parameters
    pub params: BTreeMap<String, String>,
    /// Aborts the transport call when cancelled
    pub cancellation: Option<CancellationToken>,
}

impl RequestDescriptor {
    /// Descriptor for an API endpoint path
    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    /// Descriptor for an absolute URL outside the API
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            external_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Set the JSON payload
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the payload from any serializable value
    pub fn json_body<T: Serialize>(mut self, value: &T) -> crate::Result<Self> {
        self.body = Some(serde_json::to_value(value)?);
        Ok(self)
    }

    /// Add or replace a header (names compare case-insensitively)
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        merge_header(&mut self.headers, key.into(), value.into());
        self
    }

    /// Set the method explicitly
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Append a suffix after the endpoint path
    pub fn append_in_url(mut self, suffix: impl Into<String>) -> Self {
        self.append_in_url = Some(suffix.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Attach a cancellation token
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Method actually used: explicit, else POST with a body, else GET
    pub fn effective_method(&self) -> HttpMethod {
        match (self.method, &self.body) {
            (Some(method), _) => method,
            (None, Some(_)) => HttpMethod::Post,
            (None, None) => HttpMethod::Get,
        }
    }
}

/// Insert a header, replacing any existing one with the same name
pub(crate) fn merge_header(headers: &mut Vec<(String, String)>, key: String, value: String) {
    headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&key));
    headers.push((key, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_defaults_to_get_without_body() {
        let descriptor = RequestDescriptor::endpoint("profile");
        assert_eq!(descriptor.effective_method(), HttpMethod::Get);
    }

    #[test]
    fn test_method_defaults_to_post_with_body() {
        let descriptor = RequestDescriptor::endpoint("login").body(json!({"user": "ada"}));
        assert_eq!(descriptor.effective_method(), HttpMethod::Post);
    }

    #[test]
    fn test_explicit_method_wins() {
        let descriptor = RequestDescriptor::endpoint("profile")
            .body(json!({"name": "ada"}))
            .method(HttpMethod::Patch);
        assert_eq!(descriptor.effective_method(), HttpMethod::Patch);
    }

    #[test]
    fn test_header_replaces_case_insensitively() {
        let descriptor = RequestDescriptor::endpoint("x")
            .header("X-Trace", "1")
            .header("x-trace", "2");
        assert_eq!(descriptor.headers, vec![("x-trace".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_json_body() {
        #[derive(Serialize)]
        struct Login {
            email: String,
        }

        let descriptor = RequestDescriptor::endpoint("login")
            .json_body(&Login { email: "a@b.c".to_string() })
            .unwrap();
        assert_eq!(descriptor.body, Some(json!({"email": "a@b.c"})));
    }

    #[test]
    fn test_external_descriptor() {
        let descriptor = RequestDescriptor::external("https://cdn.example.com/config.json")
            .param("v", "2")
            .append_in_url("ignored");
        assert!(descriptor.endpoint.is_none());
        assert_eq!(descriptor.params.get("v"), Some(&"2".to_string()));
    }
}
