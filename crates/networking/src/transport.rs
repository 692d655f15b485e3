//! Transport seam
//!
//! Plain-data request/response types and the [`HttpTransport`] trait the
//! request layer talks to. Everything above this module (retry, dispatch,
//! classification) is written against the trait so it can be exercised
//! without a network.

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Method
// =============================================================================

/// HTTP method of an outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
}

impl HttpMethod {
    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether repeating the request is safe
    pub fn is_idempotent(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Put | HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

// =============================================================================
// Request / Response
// =============================================================================

/// A fully resolved outgoing request
///
/// Headers are an ordered list so the exact snapshot that was sent can be
/// inspected after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL
    pub url: String,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Serialized body
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request with no headers, query or body
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Check every header is valid HTTP, naming the first one that is not
    pub fn validate_headers(&self) -> Result<(), String> {
        for (name, value) in &self.headers {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| format!("invalid header {name}: {e}"))?;
            HeaderValue::from_str(value).map_err(|e| format!("invalid header {name}: {e}"))?;
        }
        Ok(())
    }
}

/// A response as received from the server, any status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Raw body text
    pub body: String,
}

impl HttpResponse {
    /// Create a response with no headers
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Check if the response is successful (2xx status)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the server reported a failure of its own (5xx status)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Why a request never produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection could not be made or was dropped
    Network,
    /// The request timed out
    Timeout,
    /// The request could not be built (bad URL, bad header)
    InvalidRequest,
    /// The caller cancelled the request
    Cancelled,
}

/// Failure below the HTTP status layer: no response was received
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}", code = .kind.code())]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportErrorKind {
    /// Stable error code reported to the alert layer
    pub fn code(&self) -> &'static str {
        match self {
            TransportErrorKind::Network => "ERR_NETWORK",
            TransportErrorKind::Timeout => "ECONNABORTED",
            TransportErrorKind::InvalidRequest => "ERR_BAD_REQUEST",
            TransportErrorKind::Cancelled => "ERR_CANCELED",
        }
    }
}

impl TransportError {
    /// Create a new transport error
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a cancellation
    pub fn cancelled() -> Self {
        Self::new(TransportErrorKind::Cancelled, "canceled")
    }

    /// What went wrong
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Stable error code, see [`TransportErrorKind::code`]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Human-readable detail
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this is a plain connectivity failure
    pub fn is_network_error(&self) -> bool {
        self.kind == TransportErrorKind::Network
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_builder() {
            TransportErrorKind::InvalidRequest
        } else {
            TransportErrorKind::Network
        };
        TransportError::new(kind, err.to_string())
    }
}

// =============================================================================
// Transport trait
// =============================================================================

/// Executes one HTTP round-trip
///
/// Implementations return `Ok` for every response the server sent, whatever
/// its status; `Err` means no response exists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and wait for the response
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_headers() {
        let mut request = HttpRequest::new(HttpMethod::Get, "https://example.com");
        request.headers.push(("X-Trace".to_string(), "1".to_string()));
        assert_eq!(request.validate_headers(), Ok(()));

        request.headers.push(("bad header".to_string(), "v".to_string()));
        let err = request.validate_headers().unwrap_err();
        assert!(err.starts_with("invalid header bad header"));

        let mut request = HttpRequest::new(HttpMethod::Get, "https://example.com");
        request.headers.push(("X-Note".to_string(), "line\nbreak".to_string()));
        assert!(request.validate_headers().is_err());
    }

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
        assert_eq!(HttpMethod::Patch.as_str(), "PATCH");
    }

    #[test]
    fn test_idempotent_methods() {
        assert!(HttpMethod::Get.is_idempotent());
        assert!(HttpMethod::Put.is_idempotent());
        assert!(HttpMethod::Delete.is_idempotent());
        assert!(!HttpMethod::Post.is_idempotent());
        assert!(!HttpMethod::Patch.is_idempotent());
    }

    #[test]
    fn test_request_header_lookup_ignores_case() {
        let mut request = HttpRequest::new(HttpMethod::Get, "https://example.com");
        request
            .headers
            .push(("Content-Type".to_string(), "application/json".to_string()));

        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("Authorization"), None);
    }

    #[test]
    fn test_response_status_helpers() {
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(400, "").is_success());
        assert!(HttpResponse::new(503, "").is_server_error());
        assert!(!HttpResponse::new(404, "").is_server_error());
    }

    #[test]
    fn test_transport_error_codes() {
        let err = TransportError::new(TransportErrorKind::Network, "connection refused");
        assert_eq!(err.code(), "ERR_NETWORK");
        assert!(err.is_network_error());
        assert!(err.to_string().contains("connection refused"));

        let cancelled = TransportError::cancelled();
        assert_eq!(cancelled.code(), "ERR_CANCELED");
        assert!(!cancelled.is_network_error());
    }

    #[test]
    fn test_method_serde_uses_wire_names() {
        let json = serde_json::to_string(&HttpMethod::Patch).unwrap();
        assert_eq!(json, "\"PATCH\"");
    }
}
