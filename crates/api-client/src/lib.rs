//! App Scaffold API Client
//!
//! This crate provides the centralized request layer of the app: the
//! endpoint registry, the shared credential and configuration state, the
//! request dispatcher with its error classification, and the API facade
//! that screens call.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod context;
pub mod credentials;
pub mod descriptor;
pub mod dispatcher;
pub mod endpoints;
pub mod hooks;
pub mod outcome;
pub mod token_store;

#[cfg(test)]
mod test_support;

pub use api::Api;
pub use config::{ConfigStore, DispatcherConfig};
pub use context::RequestContext;
pub use credentials::{CredentialStore, Credentials};
pub use descriptor::RequestDescriptor;
pub use dispatcher::{DispatcherBuilder, RequestDispatcher};
pub use endpoints::{Endpoint, HostEnvironment, ServiceHost};
pub use hooks::{Alert, AlertPresenter, NavigationHandle, TokenPersistence};
pub use networking::HttpMethod;
pub use outcome::ErrorOutcome;
pub use token_store::PersistedTokenStore;

/// Result type for API client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for API client operations outside of request dispatch
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Token persistence error
    #[error("Persistence error: {0}")]
    Persistence(#[from] storage::PersistenceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let err = Error::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert!(err.to_string().contains("JSON error"));
    }
}
