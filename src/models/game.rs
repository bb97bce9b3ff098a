//! Game model - one doubles match between two teams on a court.

use serde::{Deserialize, Serialize};

/// A player is identified by name only.
pub type Player = String;

/// An unordered pair of players, stored with its members sorted.
///
/// Used both for teams and as the key of partner/opponent history, so
/// `Pair::new("Bob", "Alice") == Pair::new("Alice", "Bob")`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(Player, Player)", into = "(Player, Player)")]
pub struct Pair(Player, Player);

impl Pair {
    pub fn new(a: impl Into<Player>, b: impl Into<Player>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn first(&self) -> &Player {
        &self.0
    }

    pub fn second(&self) -> &Player {
        &self.1
    }

    pub fn members(&self) -> [&Player; 2] {
        [&self.0, &self.1]
    }

    /// The four player pairings across the net when `self` plays `other`.
    pub fn opponents(&self, other: &Pair) -> [Pair; 4] {
        [
            Pair::new(self.0.as_str(), other.0.as_str()),
            Pair::new(self.0.as_str(), other.1.as_str()),
            Pair::new(self.1.as_str(), other.0.as_str()),
            Pair::new(self.1.as_str(), other.1.as_str()),
        ]
    }

    /// Both members are the same player.
    pub fn is_degenerate(&self) -> bool {
        self.0 == self.1
    }
}

impl From<(Player, Player)> for Pair {
    fn from((a, b): (Player, Player)) -> Self {
        Self::new(a, b)
    }
}

impl From<Pair> for (Player, Player) {
    fn from(pair: Pair) -> Self {
        (pair.0, pair.1)
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} & {}", self.0, self.1)
    }
}

/// A single game within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Court number, 1-based
    pub court: u32,

    #[serde(rename = "teamA")]
    pub team_a: Pair,

    #[serde(rename = "teamB")]
    pub team_b: Pair,

    /// Games won by team A, absent until results are recorded
    #[serde(rename = "scoreA", default)]
    pub score_a: Option<u32>,

    /// Games won by team B, absent until results are recorded
    #[serde(rename = "scoreB", default)]
    pub score_b: Option<u32>,
}

impl Game {
    pub fn new(court: u32, team_a: Pair, team_b: Pair) -> Self {
        Self {
            court,
            team_a,
            team_b,
            score_a: None,
            score_b: None,
        }
    }

    /// All four players, team A first.
    pub fn players(&self) -> [&Player; 4] {
        [
            self.team_a.first(),
            self.team_a.second(),
            self.team_b.first(),
            self.team_b.second(),
        ]
    }

    pub fn opponent_pairs(&self) -> [Pair; 4] {
        self.team_a.opponents(&self.team_b)
    }

    pub fn is_scored(&self) -> bool {
        self.score_a.is_some() || self.score_b.is_some()
    }
}

/// The games of one round, in court order.
pub type Round = Vec<Game>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_canonical() {
        assert_eq!(Pair::new("Bob", "Alice"), Pair::new("Alice", "Bob"));
        assert_eq!(Pair::new("Bob", "Alice").first(), "Alice");
    }

    #[test]
    fn test_pair_ordering_is_case_sensitive() {
        // Uppercase sorts before lowercase in byte order.
        let pair = Pair::new("alice", "Bob");
        assert_eq!(pair.first(), "Bob");
        assert_eq!(pair.second(), "alice");
    }

    #[test]
    fn test_pair_no_separator_collision() {
        // A joined string key "a|b|c" would be ambiguous; the pair type is not.
        assert_ne!(Pair::new("a|b", "c"), Pair::new("a", "b|c"));
    }

    #[test]
    fn test_pair_serializes_as_array() {
        let json = serde_json::to_string(&Pair::new("Dave", "Carol")).unwrap();
        assert_eq!(json, r#"["Carol","Dave"]"#);
    }

    #[test]
    fn test_pair_deserialize_canonicalizes() {
        let pair: Pair = serde_json::from_str(r#"["Dave","Carol"]"#).unwrap();
        assert_eq!(pair.first(), "Carol");
    }

    #[test]
    fn test_game_serialization_field_names() {
        let game = Game::new(1, Pair::new("Alice", "Bob"), Pair::new("Carol", "Dave"));
        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(value["court"], 1);
        assert_eq!(value["teamA"][0], "Alice");
        assert_eq!(value["teamB"][1], "Dave");
        assert!(value["scoreA"].is_null());
    }

    #[test]
    fn test_game_missing_scores_default_to_none() {
        let json = r#"{"court":2,"teamA":["A","B"],"teamB":["C","D"]}"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert_eq!(game.court, 2);
        assert!(!game.is_scored());
    }

    #[test]
    fn test_opponent_pairs() {
        let game = Game::new(1, Pair::new("Alice", "Bob"), Pair::new("Carol", "Dave"));
        let pairs = game.opponent_pairs();
        assert!(pairs.contains(&Pair::new("Alice", "Carol")));
        assert!(pairs.contains(&Pair::new("Alice", "Dave")));
        assert!(pairs.contains(&Pair::new("Bob", "Carol")));
        assert!(pairs.contains(&Pair::new("Bob", "Dave")));
    }
}
