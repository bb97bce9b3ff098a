//! Tournament model - a named, persisted Americano engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::{Game, Player, Round, TournamentId};
use crate::engine::{Americano, EngineError, LeaderboardRow};

/// Reasons a score submission is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Scores must be submitted for current round {current}, not {requested}")]
    NotCurrentRound { current: u32, requested: u32 },

    #[error("Scores already submitted for round {0}")]
    AlreadyScored(u32),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A tournament as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    pub americano: Americano,
}

impl Tournament {
    /// Create a tournament with a fresh ID.
    pub fn create(name: String, players: Vec<Player>, courts: u32) -> Result<Self, EngineError> {
        let americano = Americano::new(players, courts)?;
        let tournament = Self {
            id: TournamentId::generate(),
            name,
            created_at: Utc::now(),
            americano,
        };
        info!(
            id = %tournament.id,
            name = %tournament.name,
            players = tournament.americano.players().len(),
            courts,
            "Created tournament"
        );
        Ok(tournament)
    }

    pub fn next_round(&mut self) -> Result<Round, EngineError> {
        self.americano.next_round()
    }

    /// Latest round number and its games; `(0, [])` before the first round.
    pub fn current_round(&self) -> (u32, &[Game]) {
        let idx = self.americano.round_idx();
        let games = self
            .americano
            .round(idx)
            .map(|r| r.as_slice())
            .unwrap_or_default();
        (idx, games)
    }

    /// Record scores for `round`, which must be the current, unscored round.
    pub fn submit_scores<S: AsRef<str>>(
        &mut self,
        round: u32,
        scores: &[S],
    ) -> Result<(), SubmitError> {
        let current = self.americano.round_idx();
        if round != current {
            return Err(SubmitError::NotCurrentRound {
                current,
                requested: round,
            });
        }
        let games = self
            .americano
            .round(round)
            .ok_or(EngineError::RoundNotFound(round))?;
        if games.iter().any(Game::is_scored) {
            return Err(SubmitError::AlreadyScored(round));
        }
        self.americano.record_results(round, scores)?;
        Ok(())
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        self.americano.leaderboard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tournament() -> Tournament {
        let players = ["Alice", "Bob", "Carol", "Dave", "Erin"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Tournament::create("Friday".to_string(), players, 1).unwrap()
    }

    #[test]
    fn test_create() {
        let t = tournament();
        assert_eq!(t.name, "Friday");
        assert_eq!(t.id.as_str().len(), 10);
        assert_eq!(t.americano.round_idx(), 0);
    }

    #[test]
    fn test_create_invalid() {
        let err = Tournament::create("x".to_string(), vec!["A".to_string()], 1).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_current_round_before_start() {
        let t = tournament();
        let (idx, games) = t.current_round();
        assert_eq!(idx, 0);
        assert!(games.is_empty());
    }

    #[test]
    fn test_submit_scores() {
        let mut t = tournament();
        t.next_round().unwrap();
        t.submit_scores(1, &["6-2"]).unwrap();

        let (idx, games) = t.current_round();
        assert_eq!(idx, 1);
        assert_eq!(games[0].score_a, Some(6));
        assert_eq!(t.leaderboard()[0].points, 6);
    }

    #[test]
    fn test_submit_twice_refused() {
        let mut t = tournament();
        t.next_round().unwrap();
        t.submit_scores(1, &["6-2"]).unwrap();

        let err = t.submit_scores(1, &["6-2"]).unwrap_err();
        assert_eq!(err, SubmitError::AlreadyScored(1));
        assert_eq!(t.leaderboard()[0].points, 6);
    }

    #[test]
    fn test_submit_wrong_round() {
        let mut t = tournament();
        t.next_round().unwrap();
        t.next_round().unwrap();

        let err = t.submit_scores(1, &["6-2"]).unwrap_err();
        assert_eq!(
            err,
            SubmitError::NotCurrentRound {
                current: 2,
                requested: 1
            }
        );
    }

    #[test]
    fn test_submit_before_any_round() {
        let mut t = tournament();
        let err = t.submit_scores(0, &["6-2"]).unwrap_err();
        assert_eq!(err, SubmitError::Engine(EngineError::RoundNotFound(0)));
    }

    #[test]
    fn test_submit_bad_score_can_be_retried() {
        let mut t = tournament();
        t.next_round().unwrap();
        assert!(matches!(
            t.submit_scores(1, &["6/2"]),
            Err(SubmitError::Engine(EngineError::InvalidScoreFormat(_)))
        ));
        t.submit_scores(1, &["6-2"]).unwrap();
    }

    #[test]
    fn test_tournament_serialization() {
        let mut t = tournament();
        t.next_round().unwrap();
        t.submit_scores(1, &["6-2"]).unwrap();

        let json = serde_json::to_string_pretty(&t).unwrap();
        let parsed: Tournament = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, t);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["americano"]["round_idx"], 1);
        assert!(value["americano"]["partner_count"].is_array());
    }
}
