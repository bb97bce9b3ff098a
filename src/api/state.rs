use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::TournamentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TournamentStore>,
    pub config: Arc<AppConfig>,
    /// Held across load, mutate, save so each tournament has a single writer.
    pub write_lock: Arc<tokio::sync::Mutex<()>>,
}
