//! Versioned JSON file persistence
//!
//! A [`PersistedState`] keeps one serializable value in memory and mirrors
//! every write to a JSON file wrapped in a version number and an md5
//! checksum. Writes go to a temp file that is then renamed over the target.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Persistence error types
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Checksum did not match the stored data
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// File was written by a different schema version
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: u32,
        /// Found version
        found: u32,
    },
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// On-disk envelope
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    checksum: String,
    data: T,
}

fn checksum_of<T: Serialize>(data: &T) -> Result<String> {
    let json = serde_json::to_string(data)?;
    Ok(format!("{:x}", md5::compute(json)))
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Path to the persistence file
    pub path: PathBuf,
    /// Current schema version
    pub version: u32,
    /// Write through a temp file and rename
    pub atomic_writes: bool,
}

impl PersistenceConfig {
    /// Create a new configuration
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            version: 1,
            atomic_writes: true,
        }
    }

    /// Set schema version
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

/// A value mirrored to a JSON file
pub struct PersistedState<T> {
    config: PersistenceConfig,
    value: RwLock<T>,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync,
{
    /// Open the file at the configured path
    ///
    /// A missing file yields `T::default()`; a corrupt or mismatched file is
    /// an error.
    pub async fn open(config: PersistenceConfig) -> Result<Self> {
        let value = match load(&config).await {
            Ok(value) => value,
            Err(PersistenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %config.path.display(), "no persisted state, using default");
                T::default()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            config,
            value: RwLock::new(value),
        })
    }

    /// Current value
    pub async fn get(&self) -> T {
        self.value.read().await.clone()
    }

    /// Replace the value and write it out
    pub async fn set(&self, new_value: T) -> Result<()> {
        let mut value = self.value.write().await;
        write(&self.config, &new_value).await?;
        *value = new_value;
        Ok(())
    }

    /// Reset to the default value and delete the file
    pub async fn clear(&self) -> Result<()> {
        let mut value = self.value.write().await;
        *value = T::default();

        match fs::remove_file(&self.config.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

async fn load<T>(config: &PersistenceConfig) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let contents = fs::read_to_string(&config.path).await?;
    let envelope: Envelope<T> = serde_json::from_str(&contents)?;

    let computed = checksum_of(&envelope.data)?;
    if computed != envelope.checksum {
        return Err(PersistenceError::Corruption(format!(
            "Checksum mismatch: expected {}, got {}",
            envelope.checksum, computed
        )));
    }

    if envelope.version != config.version {
        return Err(PersistenceError::VersionMismatch {
            expected: config.version,
            found: envelope.version,
        });
    }

    Ok(envelope.data)
}

async fn write<T: Serialize>(config: &PersistenceConfig, data: &T) -> Result<()> {
    let envelope = Envelope {
        version: config.version,
        checksum: checksum_of(data)?,
        data,
    };
    let json = serde_json::to_string_pretty(&envelope)?;

    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    if !config.atomic_writes {
        fs::write(&config.path, json).await?;
        return Ok(());
    }

    let temp_path = config.path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(json.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&temp_path, &config.path).await?;
    Ok(())
}
