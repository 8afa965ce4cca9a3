// Library crate for replay statistics: extraction, caching, batch processing
// and cross-file aggregation.

pub mod aggregate;
pub mod batch;
pub mod cache;
pub mod metrics;
pub mod replay;
pub mod shared;

// Re-export commonly used types for callers and integration tests
pub use aggregate::{aggregate, AggregateResult, PlayerProfile, ProfileBook};
pub use batch::{BatchOrchestrator, BatchReport, CancellationFlag, ProcessedFile};
pub use cache::{CacheStore, FsCacheStore, InMemoryCacheStore, ResultCache};
pub use metrics::{DerivedStats, Metric, RawCounters};
pub use replay::{FileResult, ReplayError, RoundSelection};
pub use shared::{AnalyzerConfig, AppError};
