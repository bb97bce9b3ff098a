//! Core data models.

mod game;
mod ids;
mod tournament;

pub use game::*;
pub use ids::*;
pub use tournament::*;
