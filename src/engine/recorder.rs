//! Result recording: parses textual scores and applies them to a round.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use super::{Americano, EngineError};

/// A parsed game score, e.g. `"6-3"` or `"10:8"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub team_a: u32,
    pub team_b: u32,
}

impl Score {
    pub fn new(team_a: u32, team_b: u32) -> Self {
        Self { team_a, team_b }
    }
}

fn score_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([0-9]+)\s*[-:]\s*([0-9]+)\s*$").expect("score pattern is valid")
    })
}

impl FromStr for Score {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidScoreFormat(s.to_string());
        let caps = score_pattern().captures(s).ok_or_else(invalid)?;
        // Digits only, so the sole failure left is overflow.
        let team_a = caps[1].parse().map_err(|_| invalid())?;
        let team_b = caps[2].parse().map_err(|_| invalid())?;
        Ok(Self { team_a, team_b })
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.team_a, self.team_b)
    }
}

impl Americano {
    /// Apply one score per game, in court order, to the games of `round`.
    ///
    /// The whole batch is parsed and tallied before any game is touched,
    /// so a bad or overflowing score leaves the engine unchanged. Pair history is stamped with the
    /// current round index.
    ///
    /// Not idempotent: recording the same round twice counts it twice.
    /// Callers must refuse resubmission (see `Tournament::submit_scores`).
    pub fn record_results<S: AsRef<str>>(
        &mut self,
        round: u32,
        scores: &[S],
    ) -> Result<(), EngineError> {
        let stamp = self.round_idx;
        let games = round
            .checked_sub(1)
            .and_then(|idx| self.rounds.get_mut(idx as usize))
            .ok_or(EngineError::RoundNotFound(round))?;

        if games.len() != scores.len() {
            return Err(EngineError::ArityMismatch {
                expected: games.len(),
                got: scores.len(),
            });
        }

        let parsed = scores
            .iter()
            .map(|s| s.as_ref().parse::<Score>())
            .collect::<Result<Vec<_>, _>>()?;

        // Tallies can overflow on absurd scores, so the batch is applied to
        // a copy of the history and only committed once every game fits.
        let mut history = self.history.clone();
        for (game, score) in games.iter().zip(&parsed) {
            history.apply_game(game, *score, stamp)?;
        }

        for (game, score) in games.iter_mut().zip(parsed) {
            game.score_a = Some(score.team_a);
            game.score_b = Some(score.team_b);
        }
        self.history = history;

        info!(round, games = scores.len(), "Recorded results");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::roster;

    #[test]
    fn test_parse_dash() {
        assert_eq!("6-3".parse::<Score>().unwrap(), Score::new(6, 3));
    }

    #[test]
    fn test_parse_colon() {
        assert_eq!("10:8".parse::<Score>().unwrap(), Score::new(10, 8));
        assert_eq!("6:3".parse::<Score>().unwrap(), Score::new(6, 3));
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(" 6 - 3 ".parse::<Score>().unwrap(), Score::new(6, 3));
        assert_eq!("\t0:0\n".parse::<Score>().unwrap(), Score::new(0, 0));
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["six-3", "6", "-1-3", "6-", "6--3", "6/3", "", "6-3-1", "99999999999-1"] {
            let err = bad.parse::<Score>().unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidScoreFormat(ref s) if s == bad),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_score_display() {
        assert_eq!(Score::new(6, 3).to_string(), "6-3");
    }

    #[test]
    fn test_record_results_updates_tallies() {
        let mut am = Americano::new(roster(&["Alice", "Bob", "Carol", "Dave"]), 1).unwrap();
        let games = am.next_round().unwrap();
        am.record_results(1, &["6-3"]).unwrap();

        let game = &am.rounds()[0][0];
        assert_eq!(game.score_a, Some(6));
        assert_eq!(game.score_b, Some(3));

        for p in games[0].team_a.members() {
            let stats = am.history().player(p);
            assert_eq!(stats.points, 6);
            assert_eq!(stats.games_for, 6);
            assert_eq!(stats.games_against, 3);
            assert_eq!(stats.matches_played, 1);
        }
        for p in games[0].team_b.members() {
            assert_eq!(am.history().player(p).points, 3);
        }
        assert_eq!(am.history().times_partnered(&games[0].team_a), 1);
    }

    #[test]
    fn test_record_results_arity_mismatch() {
        let mut am = Americano::new(roster(&["Alice", "Bob", "Carol", "Dave"]), 1).unwrap();
        am.next_round().unwrap();

        let err = am.record_results(1, &["6-3", "6-4"]).unwrap_err();
        assert_eq!(err, EngineError::ArityMismatch { expected: 1, got: 2 });
    }

    #[test]
    fn test_record_results_unknown_round() {
        let mut am = Americano::new(roster(&["Alice", "Bob", "Carol", "Dave"]), 1).unwrap();
        assert_eq!(
            am.record_results(1, &["6-3"]).unwrap_err(),
            EngineError::RoundNotFound(1)
        );
        assert_eq!(
            am.record_results(0, &["6-3"]).unwrap_err(),
            EngineError::RoundNotFound(0)
        );
    }

    #[test]
    fn test_bad_score_leaves_batch_untouched() {
        let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let mut am = Americano::new(roster(&names), 2).unwrap();
        am.next_round().unwrap();
        let before = am.clone();

        let err = am.record_results(1, &["6-3", "oops"]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidScoreFormat(_)));
        assert_eq!(am, before);
    }

    #[test]
    fn test_overflowing_score_leaves_state_untouched() {
        let names = ["Alice", "Bob", "Carol", "Dave"];
        let mut am = Americano::new(roster(&names), 1).unwrap();
        am.next_round().unwrap();
        am.record_results(1, &["4000000000-0"]).unwrap();
        am.next_round().unwrap();
        let before = am.clone();

        let err = am.record_results(2, &["400000000-400000000"]).unwrap_err();
        assert_eq!(
            err,
            EngineError::ScoreOverflow("400000000-400000000".to_string())
        );
        assert_eq!(am, before);
        assert!(!am.rounds()[1][0].is_scored());

        // A sane score still goes through afterwards.
        am.record_results(2, &["6-3"]).unwrap();
        assert!(am.rounds()[1][0].is_scored());
    }

    #[test]
    fn test_record_results_not_idempotent() {
        let mut am = Americano::new(roster(&["Alice", "Bob", "Carol", "Dave"]), 1).unwrap();
        am.next_round().unwrap();
        am.record_results(1, &["6-3"]).unwrap();
        am.record_results(1, &["6-3"]).unwrap();

        let matches: u32 = roster(&["Alice", "Bob", "Carol", "Dave"])
            .iter()
            .map(|p| am.history().player(p).matches_played)
            .sum();
        assert_eq!(matches, 8);
    }
}
