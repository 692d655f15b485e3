//! Error classification
//!
//! Every failed call is mapped to exactly one [`ErrorOutcome`]. The outcome
//! decides whether the user sees an alert and with what text.

use crate::hooks::Alert;
use networking::{HttpResponse, TransportError};
use serde_json::Value;
use thiserror::Error;

/// Message shown for server failures without a more specific branch
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error! please try again";

/// Classified failure of one dispatched call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorOutcome {
    /// No response and the device is offline
    #[error("Network unreachable")]
    NetworkUnreachable,

    /// No response for another reason (timeout, cancellation, bad request)
    #[error("No response from server ({code}): {message}")]
    NoServerResponse {
        /// Transport error code
        code: String,
        /// Transport error detail
        message: String,
    },

    /// 400 with the server's message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 401; session expiry is not handled yet
    #[error("Unauthorized")]
    Unauthorized,

    /// 502 or 503
    #[error("Server unavailable ({0})")]
    ServerUnavailable(u16),

    /// Any other non-2xx status
    #[error("Internal server error ({0})")]
    InternalServerError(u16),

    /// The request could not be built or sent
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ErrorOutcome {
    /// Classify a call that got no response
    pub fn from_transport_error(err: &TransportError) -> Self {
        if err.is_network_error() {
            ErrorOutcome::NetworkUnreachable
        } else {
            ErrorOutcome::NoServerResponse {
                code: err.code().to_string(),
                message: err.message().to_string(),
            }
        }
    }

    /// Classify a non-2xx response
    pub fn from_response(response: &HttpResponse) -> Self {
        match response.status {
            400 => ErrorOutcome::BadRequest(server_message(&response.body)),
            401 => ErrorOutcome::Unauthorized,
            502 | 503 => ErrorOutcome::ServerUnavailable(response.status),
            status => ErrorOutcome::InternalServerError(status),
        }
    }

    /// Alert to show for this outcome, if any
    pub fn alert(&self) -> Option<Alert> {
        match self {
            ErrorOutcome::NetworkUnreachable
            | ErrorOutcome::Unauthorized
            | ErrorOutcome::ServerUnavailable(_) => None,
            ErrorOutcome::NoServerResponse { code, message } => {
                Some(Alert::new(Some(code.as_str()), message.clone()))
            }
            ErrorOutcome::BadRequest(message) => Some(Alert::new(None, message.clone())),
            ErrorOutcome::InternalServerError(_) => Some(Alert::new(None, GENERIC_ERROR_MESSAGE)),
            ErrorOutcome::Unknown(reason) => Some(Alert::new(None, reason.clone())),
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ErrorOutcome::BadRequest(_) => Some(400),
            ErrorOutcome::Unauthorized => Some(401),
            ErrorOutcome::ServerUnavailable(status) | ErrorOutcome::InternalServerError(status) => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// `message` field of a JSON error body, else the raw body
fn server_message(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string));

    match message {
        Some(message) => message,
        None if body.trim().is_empty() => "Bad request".to_string(),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use networking::TransportErrorKind;

    #[test]
    fn test_network_error_is_unreachable() {
        let err = TransportError::new(TransportErrorKind::Network, "connection refused");
        let outcome = ErrorOutcome::from_transport_error(&err);
        assert_eq!(outcome, ErrorOutcome::NetworkUnreachable);
        assert_eq!(outcome.alert(), None);
    }

    #[test]
    fn test_timeout_is_no_server_response() {
        let err = TransportError::new(TransportErrorKind::Timeout, "timed out");
        let outcome = ErrorOutcome::from_transport_error(&err);
        assert_eq!(
            outcome.alert(),
            Some(Alert::new(Some("ECONNABORTED"), "timed out"))
        );
    }

    #[test]
    fn test_bad_request_uses_server_message() {
        let outcome = ErrorOutcome::from_response(&HttpResponse::new(400, r#"{"message":"bad input"}"#));
        assert_eq!(outcome, ErrorOutcome::BadRequest("bad input".to_string()));
        assert_eq!(outcome.alert(), Some(Alert::new(None, "bad input")));
        assert_eq!(outcome.status(), Some(400));
    }

    #[test]
    fn test_bad_request_without_message_field() {
        let outcome = ErrorOutcome::from_response(&HttpResponse::new(400, "plain text"));
        assert_eq!(outcome, ErrorOutcome::BadRequest("plain text".to_string()));

        let outcome = ErrorOutcome::from_response(&HttpResponse::new(400, ""));
        assert_eq!(outcome, ErrorOutcome::BadRequest("Bad request".to_string()));
    }

    #[test]
    fn test_unauthorized_is_silent() {
        let outcome = ErrorOutcome::from_response(&HttpResponse::new(401, ""));
        assert_eq!(outcome, ErrorOutcome::Unauthorized);
        assert_eq!(outcome.alert(), None);
    }

    #[test]
    fn test_gateway_errors_are_silent() {
        for status in [502, 503] {
            let outcome = ErrorOutcome::from_response(&HttpResponse::new(status, ""));
            assert_eq!(outcome, ErrorOutcome::ServerUnavailable(status));
            assert_eq!(outcome.alert(), None);
        }
    }

    #[test]
    fn test_other_statuses_get_generic_alert() {
        for status in [403, 404, 500, 504] {
            let outcome = ErrorOutcome::from_response(&HttpResponse::new(status, "{}"));
            assert_eq!(outcome, ErrorOutcome::InternalServerError(status));
            assert_eq!(outcome.alert(), Some(Alert::new(None, GENERIC_ERROR_MESSAGE)));
        }
    }

    #[test]
    fn test_unknown_alerts_with_reason() {
        let outcome = ErrorOutcome::Unknown("no URL".to_string());
        assert_eq!(outcome.alert(), Some(Alert::new(None, "no URL")));
        assert_eq!(outcome.status(), None);
    }
}
