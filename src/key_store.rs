//! Key-value backends for persisted credentials

use async_trait::async_trait;
use papaya::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Secured key-value storage the credential store writes through
///
/// Implementations must treat a missing key as `Ok(None)` on read and as a
/// no-op on delete.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn get_item(&self, key: &str) -> std::io::Result<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> std::io::Result<()>;

    async fn delete_item(&self, key: &str) -> std::io::Result<()>;
}

/// In-memory store using Papaya HashMap
///
/// Nothing survives the process; useful for tests and short-lived tools.
#[derive(Clone)]
pub struct MemoryKeyStore {
    items: Arc<HashMap<String, String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self {
            items: Arc::new(HashMap::new()),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.pin().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyStore {
    async fn get_item(&self, key: &str) -> std::io::Result<Option<String>> {
        Ok(self.items.pin().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.items.pin().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_item(&self, key: &str) -> std::io::Result<()> {
        self.items.pin().remove(key);
        Ok(())
    }
}

/// File-backed store: one file per key inside a private directory
///
/// Files are written with owner-only permissions on Unix.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    dir: PathBuf,
}

impl FileKeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> std::io::Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid storage key: {key:?}"),
            ));
        }
        Ok(self.dir.join(key))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyStore {
    async fn get_item(&self, key: &str) -> std::io::Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> std::io::Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&path).await?;

        // `mode` only applies on creation; tighten files left by older writers
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await?;
        }

        file.write_all(value.as_bytes()).await?;
        file.flush().await?;

        debug!(key = %key, "Stored item");
        Ok(())
    }

    async fn delete_item(&self, key: &str) -> std::io::Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
