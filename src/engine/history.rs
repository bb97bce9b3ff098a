//! Per-player tallies and per-pair partner/opponent history.

use std::collections::BTreeMap;

use crate::models::{Game, Pair, Player};

use super::recorder::Score;
use super::EngineError;

/// `last_round` of a player who has never been scheduled. Far enough in
/// the past that everyone is eligible for round 1.
pub const NEVER_PLAYED: i32 = -10;

/// Running statistics of a single player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub matches_played: u32,
    pub games_for: u32,
    pub games_against: u32,
    pub points: u32,
    /// Round the player was last scheduled in, or [`NEVER_PLAYED`]
    pub last_round: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            matches_played: 0,
            games_for: 0,
            games_against: 0,
            points: 0,
            last_round: NEVER_PLAYED,
        }
    }
}

/// How often, and when last, two players were partners or opponents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairStats {
    pub times_partnered: u32,
    pub last_partnered: Option<u32>,
    pub times_opposed: u32,
    pub last_opposed: Option<u32>,
}

/// Mutated by scheduling (`last_round`) and result recording (everything
/// else); read by the balancer and the scheduler's priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingHistory {
    pub(crate) players: BTreeMap<Player, PlayerStats>,
    pub(crate) pairs: BTreeMap<Pair, PairStats>,
}

impl PairingHistory {
    pub fn new<'a>(roster: impl IntoIterator<Item = &'a Player>) -> Self {
        Self {
            players: roster
                .into_iter()
                .map(|p| (p.clone(), PlayerStats::default()))
                .collect(),
            pairs: BTreeMap::new(),
        }
    }

    /// Stats of a player; unknown players read as fresh.
    pub fn player(&self, player: &str) -> PlayerStats {
        self.players.get(player).copied().unwrap_or_default()
    }

    pub fn pair(&self, pair: &Pair) -> PairStats {
        self.pairs.get(pair).copied().unwrap_or_default()
    }

    pub fn times_partnered(&self, pair: &Pair) -> u32 {
        self.pair(pair).times_partnered
    }

    pub fn times_opposed(&self, pair: &Pair) -> u32 {
        self.pair(pair).times_opposed
    }

    pub fn partnered_in(&self, pair: &Pair, round: u32) -> bool {
        self.pair(pair).last_partnered == Some(round)
    }

    pub fn opposed_in(&self, pair: &Pair, round: u32) -> bool {
        self.pair(pair).last_opposed == Some(round)
    }

    pub(crate) fn mark_scheduled(&mut self, player: &str, round: u32) {
        if let Some(stats) = self.players.get_mut(player) {
            stats.last_round = round as i32;
        }
    }

    /// Apply one scored game: tallies for all four players, then partner
    /// and opponent counters stamped with `round`.
    ///
    /// Fails with `ScoreOverflow` if a tally would exceed `u32::MAX`; the
    /// history may then be partly updated, so callers apply to a copy.
    pub(crate) fn apply_game(
        &mut self,
        game: &Game,
        score: Score,
        round: u32,
    ) -> Result<(), EngineError> {
        let overflow = || EngineError::ScoreOverflow(score.to_string());
        for player in game.team_a.members() {
            self.add_result(player, score.team_a, score.team_b)
                .ok_or_else(overflow)?;
        }
        for player in game.team_b.members() {
            self.add_result(player, score.team_b, score.team_a)
                .ok_or_else(overflow)?;
        }

        for team in [&game.team_a, &game.team_b] {
            let stats = self.pairs.entry(team.clone()).or_default();
            stats.times_partnered += 1;
            stats.last_partnered = Some(round);
        }

        for pair in game.opponent_pairs() {
            let stats = self.pairs.entry(pair).or_default();
            stats.times_opposed += 1;
            stats.last_opposed = Some(round);
        }
        Ok(())
    }

    fn add_result(&mut self, player: &Player, won: u32, lost: u32) -> Option<()> {
        let stats = self.players.entry(player.clone()).or_default();
        *stats = PlayerStats {
            matches_played: stats.matches_played.checked_add(1)?,
            games_for: stats.games_for.checked_add(won)?,
            games_against: stats.games_against.checked_add(lost)?,
            points: stats.points.checked_add(won)?,
            ..*stats
        };
        Some(())
    }
}
