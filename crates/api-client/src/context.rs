//! Request context
//!
//! The one shared state object of the request layer. It is built once at
//! startup, wrapped in an `Arc` and handed to the dispatcher and to anything
//! that needs to update tokens or presentation settings.

use crate::config::{ConfigStore, DispatcherConfig};
use crate::credentials::CredentialStore;

/// Credentials and dispatcher configuration shared by every call
#[derive(Debug, Default)]
pub struct RequestContext {
    credentials: CredentialStore,
    config: ConfigStore,
}

impl RequestContext {
    /// Create a context with no tokens and default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with the given settings
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            credentials: CredentialStore::new(),
            config: ConfigStore::with_config(config),
        }
    }

    /// Token store
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Presentation settings
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_config() {
        let context = RequestContext::with_config(DispatcherConfig {
            show_alert_dialog: false,
            ..Default::default()
        });
        assert!(!context.config().snapshot().show_alert_dialog);
        assert!(context.credentials().access_token().is_none());
    }
}
