pub mod cancel;
pub mod models;
pub mod orchestrator;

pub use cancel::CancellationFlag;
pub use models::{BatchReport, ProcessedFile};
pub use orchestrator::{BatchOrchestrator, BatchOrchestratorBuilder};
