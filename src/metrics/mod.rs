pub mod formulas;
pub mod models;

pub use models::{DerivedStats, Metric, RawCounters, StatSamples};
