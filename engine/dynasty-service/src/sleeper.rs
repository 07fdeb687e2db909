//! Sleeper API integration
//!
//! Supplies league scoring settings and roster positions for league-adjusted values.

use crate::config::SleeperConfig;
use async_trait::async_trait;
use dynasty_engine::{LeagueSettings, RawScoringSettings};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SleeperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sleeper API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("League not found: {league_id}")]
    LeagueNotFound { league_id: String },

    #[error("Invalid league response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of league settings
#[async_trait]
pub trait LeagueSettingsProvider: Send + Sync {
    async fn league_settings(&self, league_id: &str) -> Result<LeagueSettings, SleeperError>;
}

/// Sleeper league response, reduced to the fields valuation needs
#[derive(Debug, Deserialize)]
pub struct SleeperLeague {
    pub league_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub scoring_settings: Option<RawScoringSettings>,
    #[serde(default)]
    pub roster_positions: Option<Vec<String>>,
}

impl From<SleeperLeague> for LeagueSettings {
    fn from(league: SleeperLeague) -> Self {
        Self {
            scoring_settings: league.scoring_settings.unwrap_or_default(),
            roster_positions: league.roster_positions.unwrap_or_default(),
        }
    }
}

/// Parse a league response body. Sleeper answers an unknown league with `null`.
pub fn parse_league(body: &str, league_id: &str) -> Result<SleeperLeague, SleeperError> {
    let league: Option<SleeperLeague> = serde_json::from_str(body)?;
    league.ok_or_else(|| SleeperError::LeagueNotFound { league_id: league_id.to_string() })
}

/// Sleeper API client
#[derive(Debug)]
pub struct SleeperClient {
    config: SleeperConfig,
    client: reqwest::Client,
}

impl SleeperClient {
    /// Create a new Sleeper API client
    pub fn new(config: SleeperConfig) -> Result<Self, SleeperError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn league_url(&self, league_id: &str) -> String {
        format!("{}/league/{}", self.config.api_base_url, league_id)
    }

    /// Get a league by id
    pub async fn get_league(&self, league_id: &str) -> Result<SleeperLeague, SleeperError> {
        let url = self.league_url(league_id);
        tracing::info!("Fetching Sleeper league from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SleeperError::LeagueNotFound { league_id: league_id.to_string() });
        }
        if !status.is_success() {
            tracing::error!("Sleeper API error: {} for {}", status, url);
            return Err(SleeperError::Status { status: status.as_u16(), url });
        }

        let body = response.text().await?;
        parse_league(&body, league_id)
    }
}

#[async_trait]
impl LeagueSettingsProvider for SleeperClient {
    async fn league_settings(&self, league_id: &str) -> Result<LeagueSettings, SleeperError> {
        let league = self.get_league(league_id).await?;
        tracing::debug!(
            "League {} ({}) has {} scoring settings",
            league.league_id,
            league.name.as_deref().unwrap_or("unnamed"),
            league.scoring_settings.as_ref().map_or(0, |s| s.len())
        );
        Ok(league.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_league() {
        let body = r#"{
            "league_id": "1048313545995296768",
            "name": "Dynasty IDP",
            "season": "2024",
            "status": "in_season",
            "scoring_settings": {"rec": 1.0, "bonus_rec_te": 0.5, "idp_sack": 4.0, "pass_td": 4.0},
            "roster_positions": ["QB", "RB", "WR", "TE", "SUPER_FLEX", "DL", "LB", "DB", "BN"],
            "settings": {"num_teams": 12}
        }"#;

        let league = parse_league(body, "1048313545995296768").unwrap();
        assert_eq!(league.season.as_deref(), Some("2024"));

        let settings: LeagueSettings = league.into();
        assert_eq!(settings.scoring_settings["bonus_rec_te"], 0.5);

        let format = settings.format();
        assert!(format.superflex);
        assert!(format.te_premium);
    }

    #[test]
    fn test_missing_settings_default_to_standard() {
        let league = parse_league(r#"{"league_id": "1", "roster_positions": null}"#, "1").unwrap();
        let settings: LeagueSettings = league.into();
        assert!(settings.scoring_settings.is_empty());
        assert!(settings.roster_positions.is_empty());
        assert!(!settings.format().superflex);
    }

    #[test]
    fn test_unknown_league() {
        let result = parse_league("null", "42");
        assert!(matches!(result, Err(SleeperError::LeagueNotFound { league_id }) if league_id == "42"));

        assert!(matches!(parse_league("<html>", "42"), Err(SleeperError::Parse(_))));
    }

    #[test]
    fn test_provider_as_trait_object() {
        struct Standard;

        #[async_trait]
        impl LeagueSettingsProvider for Standard {
            async fn league_settings(&self, _league_id: &str) -> Result<LeagueSettings, SleeperError> {
                Ok(LeagueSettings::default())
            }
        }

        let provider: Box<dyn LeagueSettingsProvider> = Box::new(Standard);
        let settings = tokio_test::block_on(provider.league_settings("1")).unwrap();
        assert_eq!(settings.description(), "Full PPR, IDP");
    }

    #[test]
    fn test_league_url() {
        let client = SleeperClient::new(SleeperConfig::default()).unwrap();
        assert_eq!(client.league_url("123"), "https://api.sleeper.app/v1/league/123");
    }
}
