//! Round scheduling: who plays next, and on which court.

use tracing::info;

use crate::models::{Game, Player, Round};

use super::balancer::TeamBalancer;
use super::{Americano, EngineError};

/// Players per game.
pub const GROUP_SIZE: usize = 4;

/// Highest-priority unselected players looked at when forming a group.
/// Only the first `GROUP_SIZE` of the window are taken.
const CANDIDATE_WINDOW: usize = 6;

impl Americano {
    /// Schedule the next round and append it to the history.
    ///
    /// Players are taken in priority order (fewest matches, longest wait,
    /// name) four at a time, one group per court, and each group is split
    /// by the [`TeamBalancer`]. Players left over keep their `last_round`
    /// and so move up the order next time.
    pub fn next_round(&mut self) -> Result<Round, EngineError> {
        let max_games = (self.courts as usize).min(self.players.len() / GROUP_SIZE);
        if max_games == 0 {
            return Err(EngineError::InsufficientCapacity);
        }

        let round = self.round_idx + 1;
        let order = self.priority_order();
        let balancer = TeamBalancer::new(&self.history, round);

        let mut selected: Vec<&Player> = Vec::with_capacity(max_games * GROUP_SIZE);
        let mut games = Vec::with_capacity(max_games);
        for court in 1..=max_games as u32 {
            let Some(four) = pick_four(&order, &selected) else {
                break;
            };
            selected.extend(four);
            let (team_a, team_b) = balancer.split(four);
            games.push(Game::new(court, team_a, team_b));
        }

        if games.is_empty() {
            return Err(EngineError::InsufficientCapacity);
        }

        let selected: Vec<Player> = selected.into_iter().cloned().collect();
        for player in &selected {
            self.history.mark_scheduled(player, round);
        }
        self.round_idx = round;
        self.rounds.push(games.clone());

        info!(
            round,
            games = games.len(),
            benched = self.players.len() - selected.len(),
            "Scheduled round"
        );
        Ok(games)
    }

    /// Roster sorted by (matches played, last round played, lowercase name).
    /// Stable, so players whose names differ only in case keep roster order.
    pub fn priority_order(&self) -> Vec<&Player> {
        let mut order: Vec<&Player> = self.players.iter().collect();
        order.sort_by_cached_key(|p| {
            let stats = self.history.player(p);
            (stats.matches_played, stats.last_round, p.to_lowercase())
        });
        order
    }
}

/// Next group of four from the players not yet selected this round.
fn pick_four<'a>(order: &[&'a Player], selected: &[&Player]) -> Option<[&'a Player; 4]> {
    let pool: Vec<&'a Player> = order
        .iter()
        .copied()
        .filter(|p| !selected.contains(p))
        .collect();
    if pool.len() < GROUP_SIZE {
        return None;
    }

    let window = &pool[..pool.len().min(CANDIDATE_WINDOW)];
    Some([window[0], window[1], window[2], window[3]])
}
