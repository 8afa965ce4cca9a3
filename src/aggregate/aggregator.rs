use std::collections::BTreeMap;

use tracing::debug;

use super::AggregateResult;
use crate::metrics::StatSamples;
use crate::replay::FileResult;

/// Averages each player's per-file overall stats over the files the player
/// appears in, and credits one win per file to its recorded winner.
///
/// Every file weighs the same regardless of how many rounds it holds.
pub fn aggregate<'a, I>(results: I) -> AggregateResult
where
    I: IntoIterator<Item = &'a FileResult>,
{
    let mut samples: BTreeMap<String, StatSamples> = BTreeMap::new();
    let mut win_credits: Vec<(String, u32)> = Vec::new();
    let mut files = 0;

    for result in results {
        files += 1;

        for (player, stats) in &result.overall {
            samples.entry(player.clone()).or_default().push(stats);
        }

        if let Some(winner) = &result.winner {
            match win_credits.iter_mut().find(|(name, _)| name == winner) {
                Some((_, credits)) => *credits += 1,
                None => win_credits.push((winner.clone(), 1)),
            }
        }
    }

    let players = samples
        .into_iter()
        .filter_map(|(player, samples)| samples.mean().map(|mean| (player, mean)))
        .collect();
    let winner = top_credit(&win_credits);

    debug!(files, winner = ?winner, "Aggregated replay results");

    AggregateResult {
        players,
        win_credits,
        winner,
        files,
    }
}

/// Highest credit total; the earliest entry wins a tie.
fn top_credit(credits: &[(String, u32)]) -> Option<String> {
    let mut best: Option<&(String, u32)> = None;
    for entry in credits {
        if best.map_or(true, |current| entry.1 > current.1) {
            best = Some(entry);
        }
    }
    best.map(|(name, _)| name.clone())
}
