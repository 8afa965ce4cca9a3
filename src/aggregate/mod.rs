pub mod aggregator;
pub mod models;
pub mod profiles;

pub use aggregator::aggregate;
pub use models::{AggregateResult, PlayerProfile};
pub use profiles::ProfileBook;
