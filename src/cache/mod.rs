pub mod service;
pub mod store;

mod errors;

pub use errors::CacheError;
pub use service::{
    cache_key, decode_entry, encode_entry, FileReplayLoader, ReplayLoader, ResultCache,
    ResultCacheBuilder, CACHE_ENTRY_ARITY,
};
pub use store::{CacheStore, FsCacheStore, InMemoryCacheStore, CACHE_FILE_EXTENSION};
