use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metrics::{DerivedStats, Metric};

/// Combined view over many analyzed files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Mean of each player's per-file overall values.
    pub players: BTreeMap<String, DerivedStats>,
    /// Files won per player, in order of first win.
    pub win_credits: Vec<(String, u32)>,
    pub winner: Option<String>,
    pub files: usize,
}

impl AggregateResult {
    pub fn wins(&self, player: &str) -> u32 {
        self.win_credits
            .iter()
            .find(|(name, _)| name == player)
            .map_or(0, |(_, wins)| *wins)
    }
}

/// Running cross-file record for one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player: String,
    pub games_played: u32,
    pub wins: u32,
    pub current_win_streak: u32,
    pub best_win_streak: u32,
    /// Per-file overall values, oldest first.
    pub history: BTreeMap<Metric, Vec<f64>>,
    pub personal_best: BTreeMap<Metric, f64>,
}

impl PlayerProfile {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            ..Self::default()
        }
    }

    pub fn history(&self, metric: Metric) -> &[f64] {
        self.history.get(&metric).map_or(&[], Vec::as_slice)
    }

    pub fn personal_best(&self, metric: Metric) -> Option<f64> {
        self.personal_best.get(&metric).copied()
    }
}
