//! Tournament identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of a generated tournament ID.
const ID_LEN: usize = 10;

/// Identifier of a persisted tournament.
///
/// IDs double as file names in the store, so only ASCII alphanumerics,
/// `-` and `_` are accepted, whether parsed from caller input or read
/// back from a stored file.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TournamentId(String);

impl TournamentId {
    /// Generate a fresh random ID (10 lowercase hex characters).
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..ID_LEN].to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(s: &str) -> bool {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

/// Error returned when parsing an ID with forbidden characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tournament id: {0:?}")]
pub struct InvalidTournamentId(pub String);

impl FromStr for TournamentId {
    type Err = InvalidTournamentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<String> for TournamentId {
    type Error = InvalidTournamentId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidTournamentId(s))
        }
    }
}

impl From<TournamentId> for String {
    fn from(id: TournamentId) -> Self {
        id.0
    }
}

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TournamentId({})", self.0)
    }
}
