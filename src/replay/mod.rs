pub mod discovery;
pub mod extractor;
pub mod format;
pub mod models;

mod errors;

pub use discovery::discover_replays;
pub use errors::{FailureKind, ReplayError};
pub use extractor::{analyze_bytes, analyze_file, extract};
pub use format::{classify, NormalizedReplay, ReplaySchema, RoundCounters, SchemaTag};
pub use models::*;

/// File extension used by replay exports.
pub const REPLAY_EXTENSION: &str = "ttrm";
