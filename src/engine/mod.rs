//! Americano scheduling engine.
//!
//! Owns the roster, the court count, the round history and the pairing
//! history, and implements:
//! - **scheduler**: who plays the next round and on which court
//! - **balancer**: the 2v2 split of each group of four
//! - **recorder**: applying textual scores to a round
//! - **leaderboard**: ranking players by accumulated tallies
//! - **snapshot**: lossless export/import of the whole state
//!
//! The engine does no locking and is not idempotent under repeated score
//! submission; both are the caller's job (see [`crate::models::Tournament`]).

mod balancer;
mod history;
mod leaderboard;
mod recorder;
mod scheduler;
mod snapshot;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Player, Round};

pub use balancer::TeamBalancer;
pub use history::{PairStats, PairingHistory, PlayerStats, NEVER_PLAYED};
pub use leaderboard::LeaderboardRow;
pub use recorder::Score;
pub use scheduler::GROUP_SIZE;
pub use snapshot::{PairValue, Snapshot};

/// Errors raised by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Not enough players to fill a court")]
    InsufficientCapacity,

    #[error("Expected {expected} scores, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("Invalid score '{0}'. Use e.g. 6-3")]
    InvalidScoreFormat(String),

    #[error("Malformed state: {0}")]
    MalformedState(String),

    #[error("Round {0} not found")]
    RoundNotFound(u32),

    #[error("Score '{0}' is too large to add to the running totals")]
    ScoreOverflow(String),
}

/// State of one Americano tournament.
///
/// Persisted through its [`Snapshot`], so the serialized form of an engine
/// is exactly the snapshot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Snapshot", try_from = "Snapshot")]
pub struct Americano {
    players: Vec<Player>,
    courts: u32,
    round_idx: u32,
    history: PairingHistory,
    rounds: Vec<Round>,
}

impl Americano {
    /// Create an engine for a fixed roster and court count.
    pub fn new(players: Vec<Player>, courts: u32) -> Result<Self, EngineError> {
        Self::validate_config(&players, courts)?;
        let history = PairingHistory::new(&players);
        Ok(Self {
            players,
            courts,
            round_idx: 0,
            history,
            rounds: Vec::new(),
        })
    }

    fn validate_config(players: &[Player], courts: u32) -> Result<(), EngineError> {
        if courts < 1 {
            return Err(EngineError::InvalidConfiguration(
                "courts must be >= 1".to_string(),
            ));
        }
        if players.len() < GROUP_SIZE {
            return Err(EngineError::InvalidConfiguration(format!(
                "Need at least {GROUP_SIZE} players, got {}",
                players.len()
            )));
        }
        if players.iter().any(|p| p.is_empty()) {
            return Err(EngineError::InvalidConfiguration(
                "player names must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = players.iter().find(|p| !seen.insert(p.as_str())) {
            return Err(EngineError::InvalidConfiguration(format!(
                "duplicate player {dup:?}"
            )));
        }
        Ok(())
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn courts(&self) -> u32 {
        self.courts
    }

    /// Number of rounds scheduled so far.
    pub fn round_idx(&self) -> u32 {
        self.round_idx
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Games of round `number` (1-based).
    pub fn round(&self, number: u32) -> Option<&Round> {
        number
            .checked_sub(1)
            .and_then(|idx| self.rounds.get(idx as usize))
    }

    pub fn history(&self) -> &PairingHistory {
        &self.history
    }
}
