// Replay documents come in two layouts.
//
// The `rounds` layout keeps per-player stats inside each round under
// `replay.rounds`, with an optional `replay.leaderboard` of win counts. The
// legacy layout lists player boards per round under `data` and keeps the raw
// counters in a flat `endcontext` list keyed by username.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::ReplayError;
use crate::metrics::RawCounters;

/// Result of inspecting a document's top-level markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaTag {
    Rounds,
    Legacy,
    Unrecognized,
}

impl SchemaTag {
    pub fn name(self) -> &'static str {
        match self {
            SchemaTag::Rounds => "rounds",
            SchemaTag::Legacy => "legacy",
            SchemaTag::Unrecognized => "unrecognized",
        }
    }
}

pub fn classify(document: &Value) -> SchemaTag {
    if document
        .get("replay")
        .and_then(|replay| replay.get("rounds"))
        .is_some()
    {
        SchemaTag::Rounds
    } else if document.get("data").is_some() {
        SchemaTag::Legacy
    } else {
        SchemaTag::Unrecognized
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoundsReplay {
    pub replay: RoundsBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoundsBody {
    pub rounds: Vec<Vec<RoundEntry>>,
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoundEntry {
    pub username: String,
    pub stats: RoundEntryStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoundEntryStats {
    pub pps: f64,
    pub apm: f64,
    pub vsscore: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    /// Some exports write whole counts as floats.
    #[serde(default)]
    pub wins: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyReplay {
    pub data: Vec<LegacyRound>,
    #[serde(default)]
    pub endcontext: Vec<EndContext>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyRound {
    pub board: Vec<BoardEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardEntry {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndContext {
    pub username: String,
    pub points: EndPoints,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndPoints {
    /// Attack per minute.
    pub secondary: f64,
    /// Pieces per second.
    pub tertiary: f64,
    pub extra: EndExtra,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndExtra {
    pub vs: f64,
}

/// A replay document decoded into one of the known layouts.
#[derive(Debug, Clone)]
pub enum ReplaySchema {
    Rounds(RoundsReplay),
    Legacy(LegacyReplay),
}

/// One round's players in document order.
pub type RoundCounters = Vec<(String, RawCounters)>;

/// Uniform view of either layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedReplay {
    pub rounds: Vec<RoundCounters>,
    pub winner: Option<String>,
}

impl NormalizedReplay {
    pub fn counters(&self, round: usize, player: &str) -> Option<&RawCounters> {
        self.rounds
            .get(round)?
            .iter()
            .find(|(name, _)| name == player)
            .map(|(_, raw)| raw)
    }

    /// Every player once, in order of first appearance.
    pub fn players(&self) -> Vec<&str> {
        let mut players: Vec<&str> = Vec::new();
        for (name, _) in self.rounds.iter().flatten() {
            if !players.contains(&name.as_str()) {
                players.push(name);
            }
        }
        players
    }
}

/// A repeated player keeps their first position and takes the later counters.
fn record_player(round: &mut RoundCounters, player: String, raw: RawCounters) {
    match round.iter_mut().find(|(name, _)| *name == player) {
        Some((_, existing)) => *existing = raw,
        None => round.push((player, raw)),
    }
}

impl ReplaySchema {
    pub fn from_value(document: Value) -> Result<Self, ReplayError> {
        let tag = classify(&document);
        debug!(schema = tag.name(), "Classified replay document");

        match tag {
            SchemaTag::Rounds => serde_json::from_value(document)
                .map(ReplaySchema::Rounds)
                .map_err(|e| invalid(tag, e)),
            SchemaTag::Legacy => serde_json::from_value(document)
                .map(ReplaySchema::Legacy)
                .map_err(|e| invalid(tag, e)),
            SchemaTag::Unrecognized => Err(ReplayError::UnrecognizedFormat),
        }
    }

    pub fn normalize(self) -> Result<NormalizedReplay, ReplayError> {
        match self {
            ReplaySchema::Rounds(replay) => Ok(normalize_rounds(replay)),
            ReplaySchema::Legacy(replay) => normalize_legacy(replay),
        }
    }
}

fn invalid(tag: SchemaTag, error: serde_json::Error) -> ReplayError {
    ReplayError::InvalidSchema {
        schema: tag.name(),
        message: error.to_string(),
    }
}

fn normalize_rounds(replay: RoundsReplay) -> NormalizedReplay {
    let RoundsBody {
        rounds,
        leaderboard,
    } = replay.replay;

    let rounds = rounds
        .into_iter()
        .map(|round| {
            let mut players = RoundCounters::with_capacity(round.len());
            for entry in round {
                let RoundEntryStats { pps, apm, vsscore } = entry.stats;
                record_player(
                    &mut players,
                    entry.username,
                    RawCounters::new(pps, apm, vsscore),
                );
            }
            players
        })
        .collect();

    NormalizedReplay {
        rounds,
        winner: leaderboard_winner(&leaderboard),
    }
}

fn normalize_legacy(replay: LegacyReplay) -> Result<NormalizedReplay, ReplayError> {
    let mut rounds = Vec::with_capacity(replay.data.len());

    for round in &replay.data {
        let mut players = RoundCounters::with_capacity(round.board.len());
        for board in &round.board {
            let context = replay
                .endcontext
                .iter()
                .find(|context| context.username == board.username)
                .ok_or_else(|| ReplayError::MissingEndContext(board.username.clone()))?;

            let points = &context.points;
            record_player(
                &mut players,
                board.username.clone(),
                RawCounters::new(points.tertiary, points.secondary, points.extra.vs),
            );
        }
        rounds.push(players);
    }

    Ok(NormalizedReplay {
        rounds,
        winner: None,
    })
}

/// Highest win count; the earliest entry wins a tie.
fn leaderboard_winner(entries: &[LeaderboardEntry]) -> Option<String> {
    let mut best: Option<&LeaderboardEntry> = None;
    for entry in entries {
        if best.map_or(true, |current| entry.wins > current.wins) {
            best = Some(entry);
        }
    }
    best.map(|entry| entry.username.clone())
}
