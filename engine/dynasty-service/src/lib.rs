//! Dynasty Pulse Service Library
//!
//! Configuration, logging, the Sleeper league-settings provider and the orchestration that
//! loads adapter season files and runs the dynasty engine over them.

use anyhow::{Context, Result};
use std::path::Path;

pub mod cli;
pub mod config;
pub mod logging;
pub mod service;
pub mod sleeper;

pub use config::ServiceConfig;
pub use logging::initialize_logging;
pub use service::{DynastyService, PlayerReport, ServiceError};
pub use sleeper::{LeagueSettingsProvider, SleeperClient, SleeperError};

/// Load configuration from files and environment variables
pub fn load_configuration(config_file: Option<&Path>) -> Result<ServiceConfig> {
    config::load_config(config_file).context("Failed to load service configuration")
}
