//! Service configuration management

use anyhow::{Context, Result};
use dynasty_engine::DynastyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service-level configuration
    pub service: ServiceSettings,

    /// Valuation engine configuration
    pub dynasty: DynastyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Sleeper API configuration
    pub sleeper: SleeperConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Directory holding the adapter season files
    pub data_dir: PathBuf,

    /// Current season override; derived from today's date when unset
    pub season: Option<i32>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SleeperConfig {
    pub api_base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("./data"), season: None }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl Default for SleeperConfig {
    fn default() -> Self {
        Self { api_base_url: "https://api.sleeper.app/v1".to_string(), timeout_secs: 10 }
    }
}

/// Load configuration from an optional TOML file, `.env` and environment variables
pub fn load_config(config_file: Option<&Path>) -> Result<ServiceConfig> {
    dotenv::dotenv().ok();

    let mut config = match config_file {
        Some(path) => {
            tracing::debug!("Loading configuration from file: {:?}", path);
            load_from_file(path)?
        }
        None => ServiceConfig::default(),
    };

    // Override with environment variables
    apply_env(&mut config, |key| std::env::var(key).ok())?;

    validate_config(&config)?;

    Ok(config)
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path) -> Result<ServiceConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Apply `DYNASTY_*` and `SLEEPER_*` overrides from a variable lookup
pub fn apply_env<F>(config: &mut ServiceConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(data_dir) = lookup("DYNASTY_DATA_DIR") {
        config.service.data_dir = PathBuf::from(data_dir);
    }

    if let Some(season) = lookup("DYNASTY_SEASON") {
        let season = season.trim().parse().with_context(|| format!("Invalid DYNASTY_SEASON: {}", season))?;
        config.service.season = Some(season);
    }

    if let Some(level) = lookup("DYNASTY_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(format) = lookup("DYNASTY_LOG_FORMAT") {
        config.logging.format = format;
    }

    if let Some(url) = lookup("SLEEPER_API_BASE_URL") {
        config.sleeper.api_base_url = url.trim_end_matches('/').to_string();
    }

    config.dynasty.apply_overrides(&lookup).context("Invalid valuation override")?;

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    // Validate log level
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    // Validate log format
    match config.logging.format.as_str() {
        "json" | "pretty" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    if config.sleeper.timeout_secs == 0 {
        return Err(anyhow::anyhow!("Sleeper timeout must be at least one second"));
    }

    config.dynasty.validate().context("Invalid valuation configuration")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.service.data_dir, PathBuf::from("./data"));
        assert_eq!(config.sleeper.api_base_url, "https://api.sleeper.app/v1");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServiceConfig::default();
        apply_env(
            &mut config,
            lookup(&[
                ("DYNASTY_DATA_DIR", "/srv/dynasty"),
                ("DYNASTY_SEASON", "2023"),
                ("DYNASTY_LOG_FORMAT", "json"),
                ("SLEEPER_API_BASE_URL", "http://localhost:8080/v1/"),
                ("DYNASTY_SEASONS", "4"),
            ]),
        )
        .unwrap();

        assert_eq!(config.service.data_dir, PathBuf::from("/srv/dynasty"));
        assert_eq!(config.service.season, Some(2023));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.sleeper.api_base_url, "http://localhost:8080/v1");
        assert_eq!(config.dynasty.seasons.seasons_to_aggregate, 4);
    }

    #[test]
    fn test_invalid_overrides() {
        let mut config = ServiceConfig::default();
        assert!(apply_env(&mut config, lookup(&[("DYNASTY_SEASON", "last year")])).is_err());

        let mut config = ServiceConfig::default();
        apply_env(&mut config, lookup(&[("DYNASTY_LOG_LEVEL", "loud")])).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[service]
data_dir = "/tmp/seasons"
season = 2024

[dynasty.valuation]
vorp_multiplier = 800.0

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = load_from_file(file.path()).unwrap();
        assert_eq!(config.service.season, Some(2024));
        assert_eq!(config.dynasty.valuation.vorp_multiplier, 800.0);
        assert_eq!(config.dynasty.valuation.youth_bonus, 1.15);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.sleeper.timeout_secs, 10);
    }
}
