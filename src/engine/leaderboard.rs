//! Leaderboard ranking.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Player;

use super::Americano;

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub player: Player,
    pub points: u32,
    #[serde(rename = "matches")]
    pub matches_played: u32,
    #[serde(rename = "gf")]
    pub games_for: u32,
    #[serde(rename = "ga")]
    pub games_against: u32,
}

impl LeaderboardRow {
    pub fn game_difference(&self) -> i64 {
        i64::from(self.games_for) - i64::from(self.games_against)
    }

    /// Points desc, game difference desc, matches played asc, then name
    /// case-insensitively. Exact name settles names equal up to case.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then_with(|| other.game_difference().cmp(&self.game_difference()))
            .then_with(|| self.matches_played.cmp(&other.matches_played))
            .then_with(|| {
                self.player
                    .to_lowercase()
                    .cmp(&other.player.to_lowercase())
            })
            .then_with(|| self.player.cmp(&other.player))
    }
}

impl Americano {
    /// All roster players, best first.
    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        let mut rows: Vec<LeaderboardRow> = self
            .players
            .iter()
            .map(|p| {
                let stats = self.history.player(p);
                LeaderboardRow {
                    player: p.clone(),
                    points: stats.points,
                    matches_played: stats.matches_played,
                    games_for: stats.games_for,
                    games_against: stats.games_against,
                }
            })
            .collect();
        rows.sort_by(LeaderboardRow::rank_cmp);
        rows
    }
}
