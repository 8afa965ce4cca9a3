pub mod replay_builders;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use replay_builders::{LegacyReplayBuilder, RoundsReplayBuilder};
#[allow(unused_imports)]
pub use setup::TestWorkspace;
