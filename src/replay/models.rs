use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metrics::DerivedStats;

/// One round: player identity -> that player's stats for the round.
pub type RoundStats = BTreeMap<String, DerivedStats>;

/// Rounds in replay order.
pub type RoundResult = Vec<RoundStats>;

/// Player identity -> per-metric mean over the player's rounds.
pub type OverallResult = BTreeMap<String, DerivedStats>;

/// Serialized form of a [`FileResult`]: `(rounds, overall, winner)`.
pub type FileResultParts = (RoundResult, OverallResult, Option<String>);

/// Which slice of a file's stats to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundSelection {
    /// Zero-based round index.
    Round(usize),
    Average,
}

/// Everything extracted from a single replay file.
///
/// The default value doubles as the error sentinel handed back when a file
/// cannot be analyzed: no rounds, no players, no winner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub rounds: RoundResult,
    pub overall: OverallResult,
    pub winner: Option<String>,
}

impl FileResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty() && self.overall.is_empty() && self.winner.is_none()
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.overall.keys().map(String::as_str)
    }

    pub fn select(&self, selection: RoundSelection) -> Option<&RoundStats> {
        match selection {
            RoundSelection::Round(index) => self.rounds.get(index),
            RoundSelection::Average => Some(&self.overall),
        }
    }

    /// `Round 1` .. `Round n`, then `Average`.
    pub fn round_labels(&self) -> Vec<String> {
        (1..=self.rounds.len())
            .map(|n| format!("Round {n}"))
            .chain(std::iter::once("Average".to_string()))
            .collect()
    }
}

impl From<FileResultParts> for FileResult {
    fn from((rounds, overall, winner): FileResultParts) -> Self {
        Self {
            rounds,
            overall,
            winner,
        }
    }
}

impl From<FileResult> for FileResultParts {
    fn from(result: FileResult) -> Self {
        (result.rounds, result.overall, result.winner)
    }
}
