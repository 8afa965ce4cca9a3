use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{CacheError, CacheStore};
use crate::metrics::DerivedStats;
use crate::replay::{analyze_file, FileResult, FileResultParts, ReplayError};
use crate::shared::AppError;

/// Number of top-level elements in a current cache entry.
pub const CACHE_ENTRY_ARITY: usize = 3;

/// Produces a [`FileResult`] from a replay on disk.
pub trait ReplayLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<FileResult, ReplayError>;
}

/// Reads and extracts the replay file itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileReplayLoader;

impl ReplayLoader for FileReplayLoader {
    fn load(&self, path: &Path) -> Result<FileResult, ReplayError> {
        analyze_file(path)
    }
}

/// Entries are keyed by the file's base name only.
pub fn cache_key(path: &Path) -> Result<String, CacheError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CacheError::InvalidKey(path.display().to_string()))
}

/// Refuses non-finite stats, which would serialize as `null` and never decode.
pub fn encode_entry(result: &FileResult) -> Result<Vec<u8>, CacheError> {
    let all_finite = result
        .rounds
        .iter()
        .chain(std::iter::once(&result.overall))
        .flat_map(|stats| stats.values())
        .all(DerivedStats::is_finite);
    if !all_finite {
        return Err(CacheError::Serialization(
            "result holds non-finite stats".to_string(),
        ));
    }

    let parts: FileResultParts = result.clone().into();
    serde_json::to_vec(&parts).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// `Ok(None)` when the entry has an outdated shape and must be recomputed.
pub fn decode_entry(bytes: &[u8]) -> Result<Option<FileResult>, CacheError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))?;

    match value {
        Value::Array(items) if items.len() == CACHE_ENTRY_ARITY => {
            let parts: FileResultParts = serde_json::from_value(Value::Array(items))
                .map_err(|e| CacheError::Serialization(e.to_string()))?;
            Ok(Some(parts.into()))
        }
        _ => Ok(None),
    }
}

/// Extraction results persisted per source file.
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
    loader: Arc<dyn ReplayLoader>,
}

impl ResultCache {
    pub fn builder(store: Arc<dyn CacheStore>) -> ResultCacheBuilder {
        ResultCacheBuilder::new(store)
    }

    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::builder(store).build()
    }

    /// Returns the cached result for `path`, extracting and persisting it on a
    /// miss. Failures are logged and collapse into [`FileResult::empty`].
    pub async fn get_or_compute(&self, path: &Path) -> FileResult {
        self.try_get_or_compute(path)
            .await
            .unwrap_or_else(|err| sentinel_for(path, &err))
    }

    #[instrument(skip(self), fields(file = %path.display()))]
    pub async fn try_get_or_compute(&self, path: &Path) -> Result<FileResult, AppError> {
        let key = cache_key(path)?;

        if let Some(cached) = self.lookup(&key).await {
            debug!(key = %key, "Cache hit");
            return Ok(cached);
        }

        debug!(key = %key, "Cache miss");
        self.compute_and_store(&key, path).await
    }

    /// Re-extracts `path` regardless of any cached entry and overwrites it.
    pub async fn recompute(&self, path: &Path) -> FileResult {
        self.try_recompute(path)
            .await
            .unwrap_or_else(|err| sentinel_for(path, &err))
    }

    #[instrument(skip(self), fields(file = %path.display()))]
    pub async fn try_recompute(&self, path: &Path) -> Result<FileResult, AppError> {
        let key = cache_key(path)?;
        self.compute_and_store(&key, path).await
    }

    /// Reads a usable entry. Unreadable or outdated entries count as absent.
    pub async fn lookup(&self, key: &str) -> Option<FileResult> {
        let bytes = match self.store.load(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to read cache entry");
                return None;
            }
        };

        match decode_entry(&bytes) {
            Ok(Some(result)) => Some(result),
            Ok(None) => {
                debug!(key = %key, "Cache entry has outdated shape");
                None
            }
            Err(err) => {
                warn!(key = %key, error = %err, "Discarding unreadable cache entry");
                None
            }
        }
    }

    pub async fn persist(&self, key: &str, result: &FileResult) -> Result<(), CacheError> {
        let bytes = encode_entry(result)?;
        self.store.store(key, bytes).await
    }

    async fn compute_and_store(&self, key: &str, path: &Path) -> Result<FileResult, AppError> {
        let loader = self.loader.clone();
        let owned = path.to_path_buf();
        let result = tokio::task::spawn_blocking(move || loader.load(&owned))
            .await
            .map_err(|e| AppError::Task(e.to_string()))??;

        if let Err(err) = self.persist(key, &result).await {
            warn!(key = %key, error = %err, "Failed to persist cache entry");
        }
        Ok(result)
    }
}

fn sentinel_for(path: &Path, err: &AppError) -> FileResult {
    warn!(file = %path.display(), error = %err, "Replay analysis failed");
    FileResult::empty()
}

pub struct ResultCacheBuilder {
    store: Arc<dyn CacheStore>,
    loader: Arc<dyn ReplayLoader>,
}

impl ResultCacheBuilder {
    fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            loader: Arc::new(FileReplayLoader),
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn ReplayLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn build(self) -> ResultCache {
        ResultCache {
            store: self.store,
            loader: self.loader,
        }
    }
}
