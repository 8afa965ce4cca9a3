use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::CacheError;

pub const CACHE_FILE_EXTENSION: &str = "cache";

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Byte storage for serialized cache entries, addressed by key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;
    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), CacheError>;
}

/// One `<key>.cache` file per entry inside a directory created on demand.
#[derive(Debug, Clone)]
pub struct FsCacheStore {
    dir: PathBuf,
}

impl FsCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{CACHE_FILE_EXTENSION}"))
    }
}

#[async_trait]
impl CacheStore for FsCacheStore {
    #[instrument(skip(self))]
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No cache file");
                Ok(None)
            }
            Err(e) => Err(CacheError::Storage(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    /// Writes to a staging file first and renames it over the entry, so
    /// concurrent writers of the same key leave the last complete write.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            CacheError::Storage(format!("failed to create {}: {e}", self.dir.display()))
        })?;

        let target = self.entry_path(key);
        let staging = self.dir.join(format!(
            "{key}.{CACHE_FILE_EXTENSION}.{}-{}.tmp",
            std::process::id(),
            STAGING_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        tokio::fs::write(&staging, &bytes).await.map_err(|e| {
            CacheError::Storage(format!("failed to write {}: {e}", staging.display()))
        })?;
        if let Err(e) = tokio::fs::rename(&staging, &target).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(CacheError::Storage(format!(
                "failed to replace {}: {e}",
                target.display()
            )));
        }

        debug!(path = %target.display(), "Cache entry written");
        Ok(())
    }
}

/// Map-backed store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), CacheError> {
        self.entries.write().await.insert(key.to_string(), bytes);
        Ok(())
    }
}
