//! Lossless snapshot of the engine state, the record the store persists.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{Pair, Player, Round};

use super::history::{PairStats, PairingHistory, PlayerStats};
use super::{Americano, EngineError};

/// A pair-keyed counter entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairValue {
    pub pair: Pair,
    pub value: u32,
}

/// Every field is required; counters are stored, never recomputed from
/// `rounds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub courts: u32,
    pub round_idx: u32,
    pub matches_played: BTreeMap<Player, u32>,
    pub games_for: BTreeMap<Player, u32>,
    pub games_against: BTreeMap<Player, u32>,
    pub points: BTreeMap<Player, u32>,
    pub last_round: BTreeMap<Player, i32>,
    pub partner_count: Vec<PairValue>,
    pub partner_last_round: Vec<PairValue>,
    pub opponent_count: Vec<PairValue>,
    pub opponent_last_round: Vec<PairValue>,
    pub rounds: Vec<Round>,
}

fn malformed(msg: impl Into<String>) -> EngineError {
    EngineError::MalformedState(msg.into())
}

impl Americano {
    pub fn to_snapshot(&self) -> Snapshot {
        let per_player = |f: fn(&PlayerStats) -> u32| -> BTreeMap<Player, u32> {
            self.history
                .players
                .iter()
                .map(|(p, s)| (p.clone(), f(s)))
                .collect()
        };
        let per_pair = |f: fn(&PairStats) -> Option<u32>| -> Vec<PairValue> {
            self.history
                .pairs
                .iter()
                .filter_map(|(pair, s)| {
                    f(s).map(|value| PairValue {
                        pair: pair.clone(),
                        value,
                    })
                })
                .collect()
        };

        Snapshot {
            players: self.players.clone(),
            courts: self.courts,
            round_idx: self.round_idx,
            matches_played: per_player(|s| s.matches_played),
            games_for: per_player(|s| s.games_for),
            games_against: per_player(|s| s.games_against),
            points: per_player(|s| s.points),
            last_round: self
                .history
                .players
                .iter()
                .map(|(p, s)| (p.clone(), s.last_round))
                .collect(),
            partner_count: per_pair(|s| s.last_partnered.map(|_| s.times_partnered)),
            partner_last_round: per_pair(|s| s.last_partnered),
            opponent_count: per_pair(|s| s.last_opposed.map(|_| s.times_opposed)),
            opponent_last_round: per_pair(|s| s.last_opposed),
            rounds: self.rounds.clone(),
        }
    }

    /// Rebuild an engine from a snapshot, rejecting records whose parts
    /// disagree with each other or with the roster.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, EngineError> {
        Self::validate_config(&snapshot.players, snapshot.courts)
            .map_err(|e| malformed(e.to_string()))?;

        if snapshot.round_idx as usize != snapshot.rounds.len() {
            return Err(malformed(format!(
                "round_idx {} but {} rounds recorded",
                snapshot.round_idx,
                snapshot.rounds.len()
            )));
        }

        let roster: BTreeSet<&Player> = snapshot.players.iter().collect();
        check_keys("matches_played", &snapshot.matches_played, &roster)?;
        check_keys("games_for", &snapshot.games_for, &roster)?;
        check_keys("games_against", &snapshot.games_against, &roster)?;
        check_keys("points", &snapshot.points, &roster)?;
        check_keys("last_round", &snapshot.last_round, &roster)?;

        for (i, round) in snapshot.rounds.iter().enumerate() {
            check_round(i + 1, round, snapshot.courts, &roster)?;
        }

        let mut history = PairingHistory::new(&snapshot.players);
        for (player, stats) in history.players.iter_mut() {
            // Keys were checked against the roster above.
            stats.matches_played = snapshot.matches_played[player];
            stats.games_for = snapshot.games_for[player];
            stats.games_against = snapshot.games_against[player];
            stats.points = snapshot.points[player];
            stats.last_round = snapshot.last_round[player];
        }

        let partner_count = pair_map("partner_count", snapshot.partner_count, &roster)?;
        let partner_last = pair_map("partner_last_round", snapshot.partner_last_round, &roster)?;
        let opponent_count = pair_map("opponent_count", snapshot.opponent_count, &roster)?;
        let opponent_last =
            pair_map("opponent_last_round", snapshot.opponent_last_round, &roster)?;

        if !same_keys(&partner_count, &partner_last) {
            return Err(malformed("partner_count and partner_last_round cover different pairs"));
        }
        if !same_keys(&opponent_count, &opponent_last) {
            return Err(malformed(
                "opponent_count and opponent_last_round cover different pairs",
            ));
        }

        for (pair, count) in partner_count {
            let stats = history.pairs.entry(pair.clone()).or_default();
            stats.times_partnered = count;
            stats.last_partnered = partner_last.get(&pair).copied();
        }
        for (pair, count) in opponent_count {
            let stats = history.pairs.entry(pair.clone()).or_default();
            stats.times_opposed = count;
            stats.last_opposed = opponent_last.get(&pair).copied();
        }

        Ok(Self {
            players: snapshot.players,
            courts: snapshot.courts,
            round_idx: snapshot.round_idx,
            history,
            rounds: snapshot.rounds,
        })
    }
}

impl From<Americano> for Snapshot {
    fn from(am: Americano) -> Self {
        am.to_snapshot()
    }
}

impl TryFrom<Snapshot> for Americano {
    type Error = EngineError;

    fn try_from(snapshot: Snapshot) -> Result<Self, Self::Error> {
        Americano::from_snapshot(snapshot)
    }
}

fn check_keys<V>(
    field: &str,
    map: &BTreeMap<Player, V>,
    roster: &BTreeSet<&Player>,
) -> Result<(), EngineError> {
    if map.len() != roster.len() || !map.keys().all(|p| roster.contains(p)) {
        return Err(malformed(format!("{field} does not match the roster")));
    }
    Ok(())
}

fn check_round(
    number: usize,
    round: &Round,
    courts: u32,
    roster: &BTreeSet<&Player>,
) -> Result<(), EngineError> {
    let mut seen: HashSet<&Player> = HashSet::new();
    let mut used_courts: HashSet<u32> = HashSet::new();
    for game in round {
        if game.court == 0 || game.court > courts || !used_courts.insert(game.court) {
            return Err(malformed(format!(
                "round {number}: invalid court {}",
                game.court
            )));
        }
        if game.score_a.is_some() != game.score_b.is_some() {
            return Err(malformed(format!(
                "round {number}, court {}: only one side has a score",
                game.court
            )));
        }
        for player in game.players() {
            if !roster.contains(player) {
                return Err(malformed(format!(
                    "round {number}: unknown player {player:?}"
                )));
            }
            if !seen.insert(player) {
                return Err(malformed(format!(
                    "round {number}: {player:?} appears twice"
                )));
            }
        }
    }
    Ok(())
}

fn pair_map(
    field: &str,
    entries: Vec<PairValue>,
    roster: &BTreeSet<&Player>,
) -> Result<BTreeMap<Pair, u32>, EngineError> {
    let mut map = BTreeMap::new();
    for PairValue { pair, value } in entries {
        if pair.is_degenerate() || !pair.members().iter().all(|p| roster.contains(*p)) {
            return Err(malformed(format!("{field}: invalid pair {pair}")));
        }
        if map.insert(pair.clone(), value).is_some() {
            return Err(malformed(format!("{field}: duplicate pair {pair}")));
        }
    }
    Ok(map)
}

fn same_keys(a: &BTreeMap<Pair, u32>, b: &BTreeMap<Pair, u32>) -> bool {
    a.len() == b.len() && a.keys().all(|k| b.contains_key(k))
}
