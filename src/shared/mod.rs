pub mod config;

mod errors;

pub use config::AnalyzerConfig;
pub use errors::AppError;
