use crate::error::RegistryError;
use crate::types::{RawPlayerRecord, RecordRejection};
use dynasty_engine::{MultiSeasonData, PlayerStatRecord, SeasonPlayers};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of loading one batch of adapter records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub dropped_missing_id: usize,
    pub dropped_unknown_position: usize,
}

impl LoadSummary {
    pub fn dropped(&self) -> usize {
        self.dropped_missing_id + self.dropped_unknown_position
    }
}

/// Player Registry - Season stat records keyed by season and player id
///
/// Records from several adapters (offense and defense) can be merged into the same season.
/// A later record with the same id replaces the earlier one.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    seasons: MultiSeasonData,
}

impl PlayerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { seasons: MultiSeasonData::new() }
    }

    /// Normalize and store a batch of raw records for a season
    pub fn insert_season(&mut self, season: i32, records: Vec<RawPlayerRecord>) -> LoadSummary {
        let mut summary = LoadSummary::default();
        let players = self.seasons.entry(season).or_default();

        for raw in records {
            match raw.normalize() {
                Ok(record) => {
                    players.insert(record.id.clone(), record);
                    summary.loaded += 1;
                }
                Err(rejection) => {
                    warn!("Dropping {} record: {}", season, rejection);
                    match rejection {
                        RecordRejection::MissingId => summary.dropped_missing_id += 1,
                        RecordRejection::MissingPosition { .. }
                        | RecordRejection::UnknownPosition { .. } => summary.dropped_unknown_position += 1,
                    }
                }
            }
        }

        info!(
            "Loaded {} players for {} ({} dropped)",
            summary.loaded,
            season,
            summary.dropped()
        );
        summary
    }

    /// Store an adapter payload (a JSON array of records) for a season
    pub fn insert_payload(&mut self, season: i32, payload: Value) -> Result<LoadSummary, RegistryError> {
        let records: Vec<RawPlayerRecord> = serde_json::from_value(payload)?;
        Ok(self.insert_season(season, records))
    }

    /// Load a season file written by an adapter
    pub async fn load_season_file<P: AsRef<Path>>(
        &mut self,
        season: i32,
        file_path: P,
    ) -> Result<LoadSummary, RegistryError> {
        let path = file_path.as_ref();
        info!("Loading {} season data from: {:?}", season, path);

        let records = read_records(path).await?;
        Ok(self.insert_season(season, records))
    }

    pub fn season(&self, season: i32) -> Option<&SeasonPlayers> {
        self.seasons.get(&season)
    }

    /// Loaded seasons, most recent first
    pub fn seasons(&self) -> Vec<i32> {
        self.seasons.keys().rev().copied().collect()
    }

    pub fn get(&self, season: i32, player_id: &str) -> Option<&PlayerStatRecord> {
        self.seasons.get(&season).and_then(|players| players.get(player_id))
    }

    /// Number of players in a season
    pub fn player_count(&self, season: i32) -> usize {
        self.seasons.get(&season).map_or(0, |players| players.len())
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.values().all(|players| players.is_empty())
    }

    pub fn data(&self) -> &MultiSeasonData {
        &self.seasons
    }

    pub fn into_data(self) -> MultiSeasonData {
        self.seasons
    }

    /// Search for players by partial name match in a season, sorted by name
    pub fn search_players(&self, season: i32, query: &str) -> Vec<&PlayerStatRecord> {
        let query_lower = query.to_lowercase();
        let mut matches: Vec<&PlayerStatRecord> = self
            .seasons
            .get(&season)
            .into_iter()
            .flat_map(|players| players.values())
            .filter(|record| record.name.to_lowercase().contains(&query_lower))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        matches
    }
}

/// Read an adapter file into raw records
pub async fn read_records(path: &Path) -> Result<Vec<RawPlayerRecord>, RegistryError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RegistryError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content).map_err(|source| RegistryError::Json { path: path.to_path_buf(), source })
}
