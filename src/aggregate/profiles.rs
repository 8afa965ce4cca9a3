use std::collections::BTreeMap;

use super::PlayerProfile;
use crate::replay::FileResult;

/// Session-long player profiles, grown one file at a time.
#[derive(Debug, Clone, Default)]
pub struct ProfileBook {
    profiles: BTreeMap<String, PlayerProfile>,
}

impl ProfileBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &FileResult) {
        for (player, stats) in &result.overall {
            let profile = self
                .profiles
                .entry(player.clone())
                .or_insert_with(|| PlayerProfile::new(player.clone()));

            profile.games_played += 1;

            for (metric, value) in stats.iter() {
                profile.history.entry(metric).or_default().push(value);
                profile
                    .personal_best
                    .entry(metric)
                    .and_modify(|best| *best = best.max(value))
                    .or_insert(value);
            }

            if result.winner.as_deref() == Some(player.as_str()) {
                profile.wins += 1;
                profile.current_win_streak += 1;
                profile.best_win_streak = profile.best_win_streak.max(profile.current_win_streak);
            } else {
                profile.current_win_streak = 0;
            }
        }
    }

    pub fn profile(&self, player: &str) -> Option<&PlayerProfile> {
        self.profiles.get(player)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &PlayerProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
