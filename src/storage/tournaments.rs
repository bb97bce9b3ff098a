//! Tournament document store.
//!
//! Each tournament lives in `<id>.json`. Writes go to a temporary file
//! that is renamed over the target, so a crash never leaves half a
//! document behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};
use crate::models::{Tournament, TournamentId};

/// Listing entry for a stored tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentSummary {
    pub id: String,
    pub name: String,
}

/// Reads and writes tournaments as JSON files.
#[derive(Debug, Clone)]
pub struct TournamentStore {
    dir: PathBuf,
}

impl TournamentStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            dir: config.tournaments_dir(),
        }
    }

    fn path(&self, id: &TournamentId) -> PathBuf {
        self.dir.join(format!("{}.json", id.as_str()))
    }

    /// Parse a caller-supplied ID, rejecting anything unsafe as a file name.
    pub fn parse_id(raw: &str) -> Result<TournamentId, StorageError> {
        raw.parse::<TournamentId>()
            .map_err(|e| StorageError::InvalidPath(e.0))
    }

    pub fn exists(&self, id: &TournamentId) -> bool {
        self.path(id).exists()
    }

    /// Write a tournament, replacing any previous version.
    pub fn save(&self, tournament: &Tournament) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path(&tournament.id);
        let tmp = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, tournament)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;

        debug!("Saved tournament {} to {:?}", tournament.id, path);
        Ok(())
    }

    pub fn load(&self, id: &TournamentId) -> Result<Tournament, StorageError> {
        let path = self.path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let file = File::open(&path)?;
        let tournament = serde_json::from_reader(BufReader::new(file))?;
        debug!("Loaded tournament {} from {:?}", id, path);
        Ok(tournament)
    }

    /// Summaries of every readable tournament, sorted by name
    /// case-insensitively.
    pub fn list(&self) -> Result<Vec<TournamentSummary>, StorageError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let parsed = File::open(&path)
                .map_err(StorageError::from)
                .and_then(|f| {
                    serde_json::from_reader::<_, Tournament>(BufReader::new(f))
                        .map_err(StorageError::from)
                });
            match parsed {
                Ok(t) => out.push(TournamentSummary {
                    id: t.id.to_string(),
                    name: t.name,
                }),
                Err(e) => warn!("Skipping unreadable tournament file {:?}: {}", path, e),
            }
        }

        out.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        info!("Listed {} tournaments in {:?}", out.len(), self.dir);
        Ok(out)
    }
}
