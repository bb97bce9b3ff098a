//! # Americano
//!
//! Round scheduler for Padel "Americano" doubles tournaments.
//!
//! ## Architecture
//!
//! - **engine**: Scheduling, team balancing, result recording and ranking
//! - **models**: Core data structures (players, pairs, games, tournaments)
//! - **storage**: Filesystem persistence of tournaments as JSON
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod engine;
pub mod models;
pub mod storage;

pub use models::*;
