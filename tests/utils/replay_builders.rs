use serde_json::{json, Value};

// ============================================================================
// Rounds layout (`replay.rounds` + `replay.leaderboard`)
// ============================================================================

pub struct RoundsReplayBuilder {
    rounds: Vec<Vec<Value>>,
    leaderboard: Vec<Value>,
}

#[allow(dead_code)]
impl RoundsReplayBuilder {
    pub fn new() -> Self {
        Self {
            rounds: vec![],
            leaderboard: vec![],
        }
    }

    /// Adds a round of `(username, pps, apm, vsscore)` entries.
    pub fn round(mut self, players: &[(&str, f64, f64, f64)]) -> Self {
        let entries = players
            .iter()
            .map(|(username, pps, apm, vsscore)| {
                json!({
                    "username": username,
                    "alive": true,
                    "stats": { "pps": pps, "apm": apm, "vsscore": vsscore, "garbagesent": 0 }
                })
            })
            .collect();
        self.rounds.push(entries);
        self
    }

    pub fn wins(mut self, username: &str, wins: u32) -> Self {
        self.leaderboard
            .push(json!({ "username": username, "wins": wins, "active": true }));
        self
    }

    pub fn build(&self) -> String {
        let mut replay = json!({ "rounds": self.rounds });
        if !self.leaderboard.is_empty() {
            replay["leaderboard"] = json!(self.leaderboard);
        }
        json!({ "id": "fixture", "gamemode": "league", "replay": replay }).to_string()
    }
}

// ============================================================================
// Legacy layout (`data[].board` + `endcontext`)
// ============================================================================

pub struct LegacyReplayBuilder {
    rounds: Vec<Vec<String>>,
    endcontext: Vec<Value>,
}

#[allow(dead_code)]
impl LegacyReplayBuilder {
    pub fn new() -> Self {
        Self {
            rounds: vec![],
            endcontext: vec![],
        }
    }

    pub fn round(mut self, players: &[&str]) -> Self {
        self.rounds
            .push(players.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn end_context(mut self, username: &str, pps: f64, apm: f64, vs: f64) -> Self {
        self.endcontext.push(json!({
            "username": username,
            "points": {
                "primary": 0,
                "secondary": apm,
                "tertiary": pps,
                "extra": { "vs": vs }
            }
        }));
        self
    }

    pub fn build(&self) -> String {
        let data: Vec<Value> = self
            .rounds
            .iter()
            .map(|players| {
                let board: Vec<Value> = players
                    .iter()
                    .map(|username| json!({ "username": username, "success": true }))
                    .collect();
                json!({ "board": board, "replays": [] })
            })
            .collect();
        json!({ "data": data, "endcontext": self.endcontext }).to_string()
    }
}
