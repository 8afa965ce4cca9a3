use std::num::NonZeroUsize;
use std::path::PathBuf;

use super::AppError;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_CACHE_DIR: &str = "replay_cache";

/// Settings shared by the cache and the batch orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Directory holding one `<replay>.cache` file per analyzed replay
    pub cache_dir: PathBuf,
    /// Files surfaced per progress step
    pub batch_size: usize,
    /// Concurrent extractions
    pub workers: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            batch_size: DEFAULT_BATCH_SIZE,
            workers: default_workers(),
        }
    }
}

impl AnalyzerConfig {
    /// Reads `TTRM_CACHE_DIR`, `TTRM_BATCH_SIZE` and `TTRM_WORKERS`, falling
    /// back to defaults for unset variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let cache_dir = lookup("TTRM_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);
        let batch_size = match lookup("TTRM_BATCH_SIZE") {
            Some(raw) => parse_positive("TTRM_BATCH_SIZE", &raw)?,
            None => defaults.batch_size,
        };
        let workers = match lookup("TTRM_WORKERS") {
            Some(raw) => parse_positive("TTRM_WORKERS", &raw)?,
            None => defaults.workers,
        };

        Ok(Self {
            cache_dir,
            batch_size,
            workers,
        })
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.batch_size == 0 {
            return Err(AppError::Config("batch size must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(AppError::Config("worker count must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn parse_positive(key: &str, raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AppError::Config(format!(
            "{key} must be a positive integer, got {raw:?}"
        ))),
    }
}
