//! Team balancer: picks the 2v2 split of four players with the lowest
//! history penalty.

use tracing::debug;

use crate::models::{Pair, Player};

use super::history::PairingHistory;

const W_PARTNER: f64 = 10.0;
const W_PARTNER_RECENT: f64 = 5.0;
const W_OPPONENT: f64 = 1.0;
const W_OPPONENT_RECENT: f64 = 0.5;
const FAIRNESS_DIVISOR: f64 = 100.0;

/// Scores candidate splits for the round being scheduled.
pub struct TeamBalancer<'a> {
    history: &'a PairingHistory,
    round: u32,
}

impl<'a> TeamBalancer<'a> {
    /// `round` is the round being produced; "recent" means `round - 1`.
    pub fn new(history: &'a PairingHistory, round: u32) -> Self {
        Self { history, round }
    }

    /// Split `[a, b, c, d]` into two teams.
    ///
    /// Candidates are tried in the order `ab|cd`, `ac|bd`, `ad|bc` and only
    /// a strictly lower penalty replaces the current best, so ties go to
    /// the earliest candidate.
    pub fn split(&self, four: [&Player; 4]) -> (Pair, Pair) {
        let [first, rest @ ..] = candidate_splits(four);

        let mut best_score = self.penalty(&first.0, &first.1);
        let mut best = first;
        for split in rest {
            let score = self.penalty(&split.0, &split.1);
            if score < best_score {
                best_score = score;
                best = split;
            }
        }

        debug!(
            round = self.round,
            team_a = %best.0,
            team_b = %best.1,
            penalty = best_score,
            "Balanced group"
        );
        best
    }

    /// Weighted penalty of playing `team_a` against `team_b`; lower is better.
    pub fn penalty(&self, team_a: &Pair, team_b: &Pair) -> f64 {
        let previous = self.round.checked_sub(1);
        let recent_partner = |pair: &Pair| {
            previous.is_some_and(|r| self.history.partnered_in(pair, r)) as u32
        };
        let recent_opponent = |pair: &Pair| {
            previous.is_some_and(|r| self.history.opposed_in(pair, r)) as u32
        };

        let partner_pen =
            self.history.times_partnered(team_a) + self.history.times_partnered(team_b);
        let partner_recent = recent_partner(team_a) + recent_partner(team_b);

        let cross = team_a.opponents(team_b);
        let opponent_pen: u32 = cross.iter().map(|p| self.history.times_opposed(p)).sum();
        let opponent_recent: u32 = cross.iter().map(|p| recent_opponent(p)).sum();

        let played: u32 = team_a
            .members()
            .into_iter()
            .chain(team_b.members())
            .map(|p| self.history.player(p).matches_played)
            .sum();

        W_PARTNER * partner_pen as f64
            + W_PARTNER_RECENT * partner_recent as f64
            + W_OPPONENT * opponent_pen as f64
            + W_OPPONENT_RECENT * opponent_recent as f64
            + played as f64 / FAIRNESS_DIVISOR
    }
}

/// The three ways to split four players into two teams of two.
fn candidate_splits([a, b, c, d]: [&Player; 4]) -> [(Pair, Pair); 3] {
    [
        (Pair::new(a.as_str(), b.as_str()), Pair::new(c.as_str(), d.as_str())),
        (Pair::new(a.as_str(), c.as_str()), Pair::new(b.as_str(), d.as_str())),
        (Pair::new(a.as_str(), d.as_str()), Pair::new(b.as_str(), c.as_str())),
    ]
}
