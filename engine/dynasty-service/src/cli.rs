//! # Command Line Interface
//!
//! `dynasty-pulse` subcommands for season values, player reports, league values and picks.

use crate::config::ServiceConfig;
use crate::service::{resolve_league, DynastyService, PlayerReport};
use crate::sleeper::SleeperClient;
use anyhow::Result;
use clap::{Parser, Subcommand};
use dynasty_engine::picks::pick_values;
use dynasty_engine::{LeagueAdjustedValue, LeagueFormat, Position, ValueBreakdown};
use serde::Serialize;
use std::path::PathBuf;

/// Dynasty values for fantasy football players
#[derive(Parser)]
#[command(name = "dynasty-pulse")]
#[command(about = "Dynasty values for fantasy football players", version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the season files (overrides configuration)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Value every player of one season
    Values {
        /// Season to value (defaults to the current season)
        #[arg(long)]
        season: Option<i32>,
        /// Two quarterbacks can start
        #[arg(long)]
        superflex: bool,
        /// Tight ends earn bonus points per reception
        #[arg(long)]
        tep: bool,
        /// Number of players to show
        #[arg(long, default_value = "50")]
        limit: usize,
        /// Only show one position (QB, RB, WR, TE, K, DL, LB, DB)
        #[arg(long)]
        position: Option<Position>,
    },
    /// Multi-season report for one player
    Player {
        /// Player id
        id: String,
        /// Number of recent seasons to aggregate (defaults to configuration)
        #[arg(long)]
        seasons: Option<u32>,
        #[arg(long)]
        superflex: bool,
        #[arg(long)]
        tep: bool,
    },
    /// League-adjusted values for a Sleeper league id or a saved league file
    League {
        /// Sleeper league id or path to a league JSON file
        league: String,
        #[arg(long)]
        season: Option<i32>,
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    /// Rookie draft pick values
    Picks {
        /// First draft year (defaults to the year after the current season)
        #[arg(long)]
        base_year: Option<i32>,
    },
}

/// CLI handler
pub struct CliHandler {
    service: DynastyService,
    json: bool,
}

impl CliHandler {
    pub fn new(config: ServiceConfig, json: bool) -> Self {
        Self { service: DynastyService::new(config), json }
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Values { season, superflex, tep, limit, position } => {
                let season = season.unwrap_or_else(|| self.service.current_season());
                let format = LeagueFormat::new(superflex, tep);
                let values = self.service.season_values(season, format, position, Some(limit)).await?;
                self.show(&values, |values| print_values(season, values))?;
            }
            Commands::Player { id, seasons, superflex, tep } => {
                let seasons =
                    seasons.unwrap_or(self.service.config().dynasty.seasons.seasons_to_aggregate);
                let format = LeagueFormat::new(superflex, tep);
                let report = self.service.player_report(&id, seasons, format).await?;
                self.show(&report, print_report)?;
            }
            Commands::League { league, season, limit } => {
                let client = SleeperClient::new(self.service.config().sleeper.clone())?;
                let settings = resolve_league(&league, &client).await?;
                let season = season.unwrap_or_else(|| self.service.current_season());
                let values = self.service.league_values(&settings, season, Some(limit)).await?;
                self.show(&values, |values| print_league_values(season, values))?;
            }
            Commands::Picks { base_year } => {
                let base_year = base_year.unwrap_or_else(|| self.service.current_season() + 1);
                let picks = pick_values(base_year);
                self.show(&picks, |picks| {
                    println!("{:<6} {:<8} {:>6}", "Year", "Slot", "Value");
                    for pick in picks {
                        println!("{:<6} {:<8} {:>6}", pick.year, pick.slot, pick.value);
                    }
                })?;
            }
        }
        Ok(())
    }

    fn show<T: Serialize + ?Sized>(&self, value: &T, table: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            table(value);
        }
        Ok(())
    }
}

fn print_values(season: i32, values: &[ValueBreakdown]) {
    println!("Dynasty values for {}", season);
    println!("{}", "=".repeat(72));
    println!(
        "{:<4} {:<24} {:<4} {:<4} {:>5} {:>6} {:>6} {:<10} {:<9}",
        "#", "Player", "Pos", "Team", "Age", "PPG", "Value", "Tier", "Window"
    );
    for (rank, value) in values.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:<4} {:<4} {:>5} {:>6.2} {:>6.1} {:<10} {:<9}",
            rank + 1,
            value.name,
            value.position.as_str(),
            value.team.as_deref().unwrap_or("-"),
            value.age.map_or("-".to_string(), |age| age.to_string()),
            value.ppg,
            value.display_value,
            value.vorp_tier.as_str(),
            value.dynasty_window.recommendation.as_str(),
        );
    }
}

fn print_report(report: &PlayerReport) {
    let record = &report.player.record;
    let value = &report.value;
    let window = &report.dynasty_window;

    println!("{} ({}, {})", record.name, record.position, record.team.as_deref().unwrap_or("FA"));
    println!("{}", "=".repeat(50));
    println!("Seasons:       {:?}", report.player.seasons_aggregated);
    println!("PPG:           {:.2}", value.ppg);
    println!("VORP:          {:.2} ({})", value.vorp, value.vorp_tier);
    println!("Age factor:    {:.3} ({})", value.age_factor, value.age_tier);
    println!("Value:         {} ({:.1})", value.final_value, value.display_value);
    println!(
        "Window:        {} peak years left, {} (trend factor {:.2})",
        window.window.peak_years_left, window.window.recommendation, window.trend_factor
    );
    for note in &window.trend_notes {
        println!("  {}", note);
    }
    for (key, trend) in &report.trends {
        println!(
            "Trend {:<16} {:<7} {:>6.1}%/yr  consistency {:.2}",
            key.as_str(),
            trend.direction.as_str(),
            trend.magnitude,
            trend.consistency
        );
    }
}

fn print_league_values(season: i32, values: &[LeagueAdjustedValue]) {
    match values.first() {
        Some(first) => println!("League values for {} ({})", season, first.league_type),
        None => println!("League values for {}", season),
    }
    println!("{}", "=".repeat(60));
    println!("{:<4} {:<24} {:<4} {:>6} {:>6} {:>6}", "#", "Player", "Pos", "Base", "League", "Mult");
    for (rank, value) in values.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:<4} {:>6.1} {:>6.1} {:>6.2}",
            rank + 1,
            value.breakdown.name,
            value.breakdown.position.as_str(),
            value.breakdown.display_value,
            value.league_display_value,
            value.scoring_multiplier,
        );
    }
}
