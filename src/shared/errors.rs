use thiserror::Error;

use crate::cache::CacheError;
use crate::replay::ReplayError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Worker task failed: {0}")]
    Task(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
