use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CacheError {
    #[error("Cache storage error: {0}")]
    Storage(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),

    #[error("Cannot derive a cache key from {0}")]
    InvalidKey(String),
}
