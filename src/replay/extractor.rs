use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::{FileResult, NormalizedReplay, ReplayError, ReplaySchema, RoundStats};
use crate::metrics::{DerivedStats, StatSamples};

/// Derives per-round stats and per-player means from a normalized replay.
pub fn extract(replay: NormalizedReplay) -> FileResult {
    let mut samples: BTreeMap<String, StatSamples> = BTreeMap::new();
    let mut rounds = Vec::with_capacity(replay.rounds.len());

    for round in replay.rounds {
        let stats: RoundStats = round
            .into_iter()
            .map(|(player, raw)| (player, DerivedStats::from_raw(raw)))
            .collect();

        for (player, derived) in &stats {
            samples.entry(player.clone()).or_default().push(derived);
        }
        rounds.push(stats);
    }

    let overall = samples
        .into_iter()
        .filter_map(|(player, samples)| samples.mean().map(|mean| (player, mean)))
        .collect();

    FileResult {
        rounds,
        overall,
        winner: replay.winner,
    }
}

pub fn analyze_bytes(bytes: &[u8]) -> Result<FileResult, ReplayError> {
    let document: Value =
        serde_json::from_slice(bytes).map_err(|e| ReplayError::Malformed(e.to_string()))?;
    let normalized = ReplaySchema::from_value(document)?.normalize()?;
    Ok(extract(normalized))
}

pub fn analyze_file(path: &Path) -> Result<FileResult, ReplayError> {
    let bytes = fs::read(path).map_err(|e| ReplayError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let result = analyze_bytes(&bytes)?;
    debug!(
        file = %path.display(),
        rounds = result.rounds.len(),
        players = result.overall.len(),
        "Extracted replay stats"
    );
    Ok(result)
}
