//! Dynasty Pulse
//!
//! Command line entry point: loads configuration, sets up logging and runs one subcommand.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use dynasty_service::cli::{Cli, CliHandler};
use dynasty_service::{initialize_logging, load_configuration};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir.clone() {
        config.service.data_dir = data_dir;
    }

    initialize_logging(&config.logging)?;
    info!("Starting Dynasty Pulse v{}", env!("CARGO_PKG_VERSION"));

    let handler = CliHandler::new(config, cli.json);
    handler.handle_command(cli.command).await
}
