//! Valuation orchestration
//!
//! Loads adapter season files through the stats cache, builds the player registry and runs
//! the engine over it. Lookups that can miss (player, league, season data) are reported here.

use anyhow::{Context, Result};
use dynasty_engine::multi_season::{current_season_now, default_seasons};
use dynasty_engine::{
    AggregatedPlayerRecord, EnhancedDynastyWindow, LeagueAdjustedValue, LeagueFormat, LeagueSettings,
    LeagueValueAdjuster, PlayerStatRecord, Position, SeasonAggregator, StatKey, Trend, ValueBreakdown,
    ValueCalculator,
};
use player_registry::{MemoryStatsCache, PlayerRegistry, StatsCache};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::sleeper::LeagueSettingsProvider;

/// Adapter outputs that make up one season
pub const SEASON_SOURCES: [&str; 2] = ["offense", "defense"];

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Player not found: {player_id} (searched seasons {seasons:?})")]
    PlayerNotFound { player_id: String, seasons: Vec<i32> },

    #[error("No season data for {season} in {data_dir:?}")]
    NoSeasonData { season: i32, data_dir: PathBuf },
}

/// Everything known about one player's dynasty outlook
#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub player: AggregatedPlayerRecord,
    pub value: ValueBreakdown,
    pub dynasty_window: EnhancedDynastyWindow,
    pub trends: BTreeMap<StatKey, Trend>,
}

/// Dynasty valuation service
pub struct DynastyService {
    config: ServiceConfig,
    calculator: ValueCalculator,
    cache: Arc<dyn StatsCache>,
}

impl DynastyService {
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_cache(config, Arc::new(MemoryStatsCache::new()))
    }

    pub fn with_cache(config: ServiceConfig, cache: Arc<dyn StatsCache>) -> Self {
        let calculator = ValueCalculator::new(config.dynasty.valuation.clone());
        Self { config, calculator, cache }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Configured season, or the one in progress today
    pub fn current_season(&self) -> i32 {
        self.config.service.season.unwrap_or_else(current_season_now)
    }

    /// Path of an adapter season file, `<data_dir>/<source>_<season>.json`
    pub fn season_file(&self, source: &str, season: i32) -> PathBuf {
        self.config.service.data_dir.join(format!("{}_{}.json", source, season))
    }

    /// Raw adapter payload for a season, from cache or disk. `None` when there is no file.
    async fn source_payload(&self, source: &str, season: i32) -> Result<Option<Value>> {
        let key = format!("nflverse_{}", source);
        if let Some(entry) = self.cache.read(&key, season).await {
            debug!("Using cached {} {} ({}s old)", key, season, entry.age.as_secs());
            return Ok(Some(entry.data));
        }

        let path = self.season_file(source, season);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No {} file for {} at {:?}", source, season, path);
                return Ok(None);
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", path)),
        };

        let payload: Value =
            serde_json::from_str(&contents).with_context(|| format!("Invalid season file {:?}", path))?;
        self.cache.write(&key, season, payload.clone()).await;
        Ok(Some(payload))
    }

    /// Build a registry holding every available source for the given seasons
    pub async fn load_seasons(&self, seasons: &[i32]) -> Result<PlayerRegistry> {
        let mut registry = PlayerRegistry::new();

        for &season in seasons {
            let mut found = false;
            for source in SEASON_SOURCES {
                if let Some(payload) = self.source_payload(source, season).await? {
                    registry
                        .insert_payload(season, payload)
                        .with_context(|| format!("Invalid {} payload for {}", source, season))?;
                    found = true;
                }
            }
            if !found {
                warn!("No season files for {} in {:?}", season, self.config.service.data_dir);
            }
        }

        Ok(registry)
    }

    /// Values of every player in one season, highest first
    pub async fn season_values(
        &self,
        season: i32,
        format: LeagueFormat,
        position: Option<Position>,
        limit: Option<usize>,
    ) -> Result<Vec<ValueBreakdown>> {
        let registry = self.load_seasons(&[season]).await?;
        let records = season_records(&registry, season, position);
        if registry.player_count(season) == 0 {
            return Err(ServiceError::NoSeasonData {
                season,
                data_dir: self.config.service.data_dir.clone(),
            }
            .into());
        }

        let mut values = self.calculator.value_all(&records, format);
        if let Some(limit) = limit {
            values.truncate(limit);
        }
        Ok(values)
    }

    /// Multi-season report for one player over the `season_count` most recent seasons
    pub async fn player_report(
        &self,
        player_id: &str,
        season_count: u32,
        format: LeagueFormat,
    ) -> Result<PlayerReport> {
        let current = self.current_season();
        let seasons = default_seasons(current, season_count);
        let registry = self.load_seasons(&seasons).await?;

        let aggregator = SeasonAggregator::new(&self.config.dynasty, current);
        let (aggregated, per_season) = aggregator.aggregate(registry.data(), player_id);
        let player = aggregated.ok_or_else(|| ServiceError::PlayerNotFound {
            player_id: player_id.to_string(),
            seasons: seasons.clone(),
        })?;

        let position = player.record.position.as_str();
        let value = self.calculator.breakdown(&player.record, format);
        let dynasty_window = aggregator.enhanced_dynasty_window(player.record.age, position, &per_season);
        let trends = aggregator.player_trends(&per_season, position);

        info!(
            "{} ({}): value {} over {} seasons",
            player.record.name,
            position,
            value.final_value,
            player.seasons_aggregated.len()
        );

        Ok(PlayerReport { player, value, dynasty_window, trends })
    }

    /// League-adjusted values of one season, highest league value first
    pub async fn league_values(
        &self,
        settings: &LeagueSettings,
        season: i32,
        limit: Option<usize>,
    ) -> Result<Vec<LeagueAdjustedValue>> {
        let format = settings.format();
        let base = self.season_values(season, format, None, None).await?;

        let adjuster = LeagueValueAdjuster::new(settings);
        info!(
            "League type {} (superflex: {}, te premium: {})",
            adjuster.league_type(),
            format.superflex,
            format.te_premium
        );

        let mut values = adjuster.adjust_all(base);
        if let Some(limit) = limit {
            values.truncate(limit);
        }
        Ok(values)
    }
}

/// League settings from a saved file, or from the provider when `league` is not a file
pub async fn resolve_league(
    league: &str,
    provider: &dyn LeagueSettingsProvider,
) -> Result<LeagueSettings> {
    let path = Path::new(league);
    if path.is_file() {
        return load_league_file(path).await;
    }

    provider
        .league_settings(league)
        .await
        .with_context(|| format!("Failed to load league {}", league))
}

/// Read league settings saved as JSON (a Sleeper league response works as-is)
pub async fn load_league_file(path: &Path) -> Result<LeagueSettings> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read league file {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid league file {:?}", path))
}

/// Season records sorted by id, optionally restricted to one position
fn season_records(
    registry: &PlayerRegistry,
    season: i32,
    position: Option<Position>,
) -> Vec<PlayerStatRecord> {
    let mut records: Vec<PlayerStatRecord> = registry
        .season(season)
        .into_iter()
        .flat_map(|players| players.values())
        .filter(|record| position.map_or(true, |p| record.position == p))
        .cloned()
        .collect();
    records.sort_by(|a, b| a.id.cmp(&b.id));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::SleeperError;
    use async_trait::async_trait;
    use dynasty_engine::TrendDirection;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_json(dir: &Path, name: &str, value: Value) {
        std::fs::write(dir.join(name), value.to_string()).unwrap();
    }

    fn offense(points: f64, yards: f64, age: u32) -> Value {
        json!([
            {"id": "rb1", "name": "Bell Cow", "team": "DET", "position": "RB", "age": age,
             "stats": {"games": 17, "fantasyPointsPpr": points, "rushingYards": yards, "receptions": 40}},
            {"id": "te1", "name": "Move Tight End", "team": "KC", "position": "TE", "age": 27,
             "stats": {"games": 17, "fantasyPointsPpr": 170.0, "receptions": 80}},
            {"id": "qb1", "name": "Game Manager", "team": "NYJ", "position": "QB", "age": 30,
             "stats": {"games": 17, "fantasyPointsPpr": 280.5}}
        ])
    }

    fn defense() -> Value {
        json!([
            {"id": 9001, "name": "Edge Rusher", "teamAbbr": "DAL", "espnPosition": "DE",
             "fantasyPosition": "DL", "age": 25,
             "stats": {"games": 17, "soloTackles": 40, "sacks": 12, "qbHits": 25}},
            {"id": 9002, "name": "Long Snapper", "espnPosition": "LS", "stats": {}}
        ])
    }

    fn service_with_data() -> (TempDir, DynastyService) {
        let dir = TempDir::new().unwrap();
        write_json(dir.path(), "offense_2024.json", offense(306.0, 1400.0, 24));
        write_json(dir.path(), "defense_2024.json", defense());
        write_json(dir.path(), "offense_2023.json", offense(272.0, 1100.0, 23));
        write_json(dir.path(), "offense_2022.json", offense(200.0, 800.0, 22));

        let mut config = ServiceConfig::default();
        config.service.data_dir = dir.path().to_path_buf();
        config.service.season = Some(2024);
        (dir, DynastyService::new(config))
    }

    struct StubProvider;

    #[async_trait]
    impl LeagueSettingsProvider for StubProvider {
        async fn league_settings(&self, league_id: &str) -> Result<LeagueSettings, SleeperError> {
            match league_id {
                "sf" => Ok(serde_json::from_value(json!({
                    "scoring_settings": {"rec": 1.0, "bonus_rec_te": 0.5},
                    "roster_positions": ["QB", "SUPER_FLEX", "RB", "WR", "TE"]
                }))?),
                _ => Err(SleeperError::LeagueNotFound { league_id: league_id.to_string() }),
            }
        }
    }

    #[tokio::test]
    async fn test_season_values() {
        let (_dir, service) = service_with_data();
        let values = service.season_values(2024, LeagueFormat::default(), None, None).await.unwrap();

        // long snapper dropped by the registry
        assert_eq!(values.len(), 4);
        assert!(values.windows(2).all(|w| w[0].final_value >= w[1].final_value));
        assert!(values.iter().any(|v| v.player_id == "9001" && v.position == Position::DL));

        let rbs = service
            .season_values(2024, LeagueFormat::default(), Some(Position::RB), Some(10))
            .await
            .unwrap();
        assert_eq!(rbs.len(), 1);
        assert_eq!(rbs[0].player_id, "rb1");

        let top = service.season_values(2024, LeagueFormat::default(), None, Some(2)).await.unwrap();
        assert_eq!(top.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_season() {
        let (_dir, service) = service_with_data();
        let err = service.season_values(2019, LeagueFormat::default(), None, None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ServiceError>(),
            Some(ServiceError::NoSeasonData { season: 2019, .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_season_file() {
        let (dir, service) = service_with_data();
        std::fs::write(dir.path().join("offense_2021.json"), "{not json").unwrap();
        assert!(service.load_seasons(&[2021]).await.is_err());
    }

    #[tokio::test]
    async fn test_payloads_are_cached() {
        let (dir, service) = service_with_data();
        let registry = service.load_seasons(&[2024]).await.unwrap();
        assert_eq!(registry.player_count(2024), 4);

        // a second load is served from the cache even after the file is gone
        std::fs::remove_file(dir.path().join("offense_2024.json")).unwrap();
        let registry = service.load_seasons(&[2024]).await.unwrap();
        assert_eq!(registry.player_count(2024), 4);
    }

    #[tokio::test]
    async fn test_player_report() {
        let (_dir, service) = service_with_data();
        let report = service.player_report("rb1", 3, LeagueFormat::default()).await.unwrap();

        assert_eq!(report.player.seasons_aggregated, vec![2024, 2023, 2022]);
        assert_eq!(report.player.record.age, Some(24));
        assert_eq!(report.dynasty_window.seasons_analyzed, 3);
        assert!(report.value.final_value > 0);

        let rushing = report.trends[&StatKey::RushingYards];
        assert_eq!(rushing.direction, TrendDirection::Up);
    }

    #[tokio::test]
    async fn test_player_not_found() {
        let (_dir, service) = service_with_data();
        let err = service.player_report("nobody", 3, LeagueFormat::default()).await.unwrap_err();
        match err.downcast_ref::<ServiceError>() {
            Some(ServiceError::PlayerNotFound { player_id, seasons }) => {
                assert_eq!(player_id, "nobody");
                assert_eq!(seasons, &vec![2024, 2023, 2022]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_league_values() {
        let (_dir, service) = service_with_data();
        let settings = resolve_league("sf", &StubProvider).await.unwrap();
        let values = service.league_values(&settings, 2024, Some(3)).await.unwrap();

        assert_eq!(values.len(), 3);
        assert!(values.windows(2).all(|w| w[0].league_value >= w[1].league_value));
        assert!(values.iter().all(|v| v.league_type == "Full PPR, TEP, IDP"));
    }

    #[tokio::test]
    async fn test_resolve_league() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("league.json");
        write_json(
            dir.path(),
            "league.json",
            json!({"league_id": "1", "scoring_settings": {"rec": 0.5}, "roster_positions": ["QB", "QB"]}),
        );

        let settings = resolve_league(path.to_str().unwrap(), &StubProvider).await.unwrap();
        assert!(settings.format().superflex);
        assert_eq!(settings.description(), "Half PPR, IDP");

        assert!(resolve_league("missing", &StubProvider).await.is_err());
    }

    #[tokio::test]
    async fn test_league_file_with_null_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("league.json");
        write_json(
            dir.path(),
            "league.json",
            json!({"league_id": "1", "scoring_settings": {"rec": 0.5}, "roster_positions": null}),
        );

        let settings = load_league_file(&path).await.unwrap();
        assert!(settings.roster_positions.is_empty());
        assert!(!settings.format().superflex);
        assert_eq!(settings.description(), "Half PPR, IDP");
    }
}
