//! Durable token storage
//!
//! [`PersistedTokenStore`] keeps the token pair in a versioned JSON file so
//! a restarted app can restore the session into its [`RequestContext`].

use crate::context::RequestContext;
use crate::credentials::Credentials;
use crate::hooks::TokenPersistence;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use storage::{PersistedState, PersistenceConfig};

/// Schema version of the token file
pub const TOKEN_FILE_VERSION: u32 = 1;

/// Token pair mirrored to disk
pub struct PersistedTokenStore {
    state: PersistedState<Credentials>,
}

impl PersistedTokenStore {
    /// Open (or start) the token file at `path`
    pub async fn open(path: impl Into<PathBuf>) -> crate::Result<Self> {
        let config = PersistenceConfig::new(path).version(TOKEN_FILE_VERSION);
        let state = PersistedState::open(config).await?;
        Ok(Self { state })
    }

    /// Tokens currently on disk
    pub async fn stored(&self) -> Credentials {
        self.state.get().await
    }

    /// Load the stored tokens into `context`
    ///
    /// Returns whether a complete pair was restored. An incomplete pair is
    /// left on disk but not applied.
    pub async fn restore(&self, context: &RequestContext) -> bool {
        let stored = self.stored().await;
        if !stored.is_complete() {
            tracing::debug!("no stored session to restore");
            return false;
        }
        context.credentials().replace(stored);
        tracing::info!("restored session tokens");
        true
    }

    /// Forget the stored tokens
    pub async fn clear(&self) -> crate::Result<()> {
        self.state.clear().await?;
        Ok(())
    }

    /// File the tokens are written to
    pub fn path(&self) -> &Path {
        self.state.path()
    }
}

#[async_trait]
impl TokenPersistence for PersistedTokenStore {
    async fn persist(&self, credentials: &Credentials) -> crate::Result<()> {
        self.state.set(credentials.clone()).await?;
        tracing::debug!(path = %self.path().display(), "tokens persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pair(access: &str, refresh: &str) -> Credentials {
        Credentials::new(Some(access.to_string()), Some(refresh.to_string()))
    }

    #[tokio::test]
    async fn test_missing_file_restores_nothing() {
        let dir = TempDir::new().unwrap();
        let store = PersistedTokenStore::open(dir.path().join("tokens.json"))
            .await
            .unwrap();

        let context = RequestContext::new();
        assert!(!store.restore(&context).await);
        assert_eq!(context.credentials().snapshot(), Credentials::default());
    }

    #[tokio::test]
    async fn test_persist_then_restore_after_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokens.json");

        {
            let store = PersistedTokenStore::open(&path).await.unwrap();
            store.persist(&pair("T1", "T2")).await.unwrap();
        }

        let store = PersistedTokenStore::open(&path).await.unwrap();
        let context = RequestContext::new();
        assert!(store.restore(&context).await);
        assert_eq!(context.credentials().access_token().as_deref(), Some("T1"));
        assert_eq!(context.credentials().refresh_token().as_deref(), Some("T2"));
    }

    #[tokio::test]
    async fn test_incomplete_pair_not_applied() {
        let dir = TempDir::new().unwrap();
        let store = PersistedTokenStore::open(dir.path().join("tokens.json"))
            .await
            .unwrap();
        store
            .persist(&Credentials::new(Some("only".to_string()), None))
            .await
            .unwrap();

        let context = RequestContext::new();
        assert!(!store.restore(&context).await);
        assert!(context.credentials().access_token().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokens.json");
        let store = PersistedTokenStore::open(&path).await.unwrap();
        store.persist(&pair("a", "r")).await.unwrap();
        assert!(path.exists());

        store.clear().await.unwrap();
        assert!(!path.exists());
        assert_eq!(store.stored().await, Credentials::default());
    }

    #[tokio::test]
    async fn test_file_from_other_version_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokens.json");
        {
            let state = PersistedState::open(
                PersistenceConfig::new(&path).version(TOKEN_FILE_VERSION + 1),
            )
            .await
            .unwrap();
            state.set(pair("a", "r")).await.unwrap();
        }

        let result = PersistedTokenStore::open(&path).await;
        assert!(matches!(
            result,
            Err(crate::Error::Persistence(storage::PersistenceError::VersionMismatch { .. }))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokens.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let result = PersistedTokenStore::open(&path).await;
        assert!(matches!(result, Err(crate::Error::Persistence(_))));
    }
}
