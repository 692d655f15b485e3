//! Credential store
//!
//! Holds the access/refresh token pair attached to outgoing requests. The
//! store lives as long as its [`RequestContext`](crate::RequestContext);
//! durable storage is handled by a [`TokenPersistence`](crate::TokenPersistence)
//! collaborator.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Access and refresh token pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Token sent as `Authorization: Bearer <token>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Token sent in the `refreshToken` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }

    /// Both tokens present and non-empty
    pub fn is_complete(&self) -> bool {
        non_empty(&self.access_token).is_some() && non_empty(&self.refresh_token).is_some()
    }
}

pub(crate) fn non_empty(token: &Option<String>) -> Option<&str> {
    token.as_deref().filter(|t| !t.is_empty())
}

/// Shared, lock-guarded token pair
///
/// Writers replace both tokens in one write; last write wins.
#[derive(Debug, Default)]
pub struct CredentialStore {
    inner: RwLock<Credentials>,
}

impl CredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both tokens
    pub fn set_credentials(&self, access_token: Option<String>, refresh_token: Option<String>) {
        self.replace(Credentials::new(access_token, refresh_token));
    }

    /// Replace the whole credential pair
    pub fn replace(&self, credentials: Credentials) {
        *self.inner.write() = credentials;
    }

    /// Copy of the current tokens
    pub fn snapshot(&self) -> Credentials {
        self.inner.read().clone()
    }

    /// Current access token
    pub fn access_token(&self) -> Option<String> {
        self.inner.read().access_token.clone()
    }

    /// Current refresh token
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.read().refresh_token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_starts_empty() {
        let store = CredentialStore::new();
        assert_eq!(store.snapshot(), Credentials::default());
        assert!(!store.snapshot().is_complete());
    }

    #[test]
    fn test_set_credentials_replaces_both() {
        let store = CredentialStore::new();
        store.set_credentials(Some("a1".to_string()), Some("r1".to_string()));
        store.set_credentials(Some("a2".to_string()), None);

        assert_eq!(store.access_token(), Some("a2".to_string()));
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn test_set_none_clears() {
        let store = CredentialStore::new();
        store.set_credentials(Some("a".to_string()), Some("r".to_string()));
        store.set_credentials(None, None);
        assert_eq!(store.snapshot(), Credentials::default());
    }

    #[test]
    fn test_is_complete_ignores_empty_tokens() {
        let creds = Credentials::new(Some(String::new()), Some("r".to_string()));
        assert!(!creds.is_complete());

        let creds = Credentials::new(Some("a".to_string()), Some("r".to_string()));
        assert!(creds.is_complete());
    }

    #[test]
    fn test_credentials_serde_camel_case() {
        let creds = Credentials::new(Some("a".to_string()), None);
        let json = serde_json::to_string(&creds).unwrap();
        assert_eq!(json, r#"{"accessToken":"a"}"#);
    }
}
