//! Steam catalog records
//!
//! The catalog is a JSON array exported from SteamDB. Records are positional:
//! the index of a record in the filtered catalog is the index of its
//! embedding vector.

use crate::errors::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Minimum owner count (exclusive) for a game to be indexed
pub const POPULARITY_THRESHOLD: u64 = 35_000;

/// One game of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub name: String,
    pub description: String,
    pub tags: String,
    pub genres: String,
    pub popularity: u64,
}

impl GameRecord {
    /// Whether the record carries enough signal to be indexed
    pub fn is_indexable(&self) -> bool {
        !self.description.is_empty() && self.popularity > POPULARITY_THRESHOLD
    }
}

/// Catalog row as exported; every field may be null or absent
#[derive(Debug, Deserialize)]
struct RawGameRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    genres: Option<String>,
    #[serde(default, alias = "popularity")]
    stsp_owners: Option<u64>,
}

impl From<RawGameRecord> for GameRecord {
    fn from(raw: RawGameRecord) -> Self {
        Self {
            name: raw.name.unwrap_or_default().trim().to_string(),
            description: raw.description.unwrap_or_default(),
            tags: raw.tags.unwrap_or_default(),
            genres: raw.genres.unwrap_or_default(),
            popularity: raw.stsp_owners.unwrap_or(0),
        }
    }
}

/// Parse the catalog file
pub fn load_catalog(path: &Path) -> Result<Vec<GameRecord>> {
    info!(path = %path.display(), "Started loading steamdb data");

    let contents = fs::read_to_string(path).map_err(|e| {
        AgentError::DataLoadError(format!("Failed to read catalog {}: {}", path.display(), e))
    })?;
    let records = parse_catalog(&contents)
        .map_err(|e| AgentError::DataLoadError(format!("{}: {}", path.display(), e)))?;

    info!(records = records.len(), "Loaded steamdb data");
    Ok(records)
}

/// Parse catalog contents already in memory
pub fn parse_catalog(contents: &str) -> std::result::Result<Vec<GameRecord>, String> {
    let raw: Vec<RawGameRecord> = serde_json::from_str(contents)
        .map_err(|e| format!("malformed catalog: {}", e))?;
    Ok(raw.into_iter().map(GameRecord::from).collect())
}

/// Keep only indexable records, preserving catalog order
pub fn filter_catalog(records: Vec<GameRecord>) -> Vec<GameRecord> {
    let before = records.len();
    let kept: Vec<GameRecord> = records.into_iter().filter(GameRecord::is_indexable).collect();
    info!(before, after = kept.len(), "Filtered steamdb catalog");
    kept
}
