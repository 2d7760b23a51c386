mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use pharmacy_locator::LocatorConfig;
use pharmacy_locator::logging::init_tracing;

#[derive(Parser)]
#[command(name = "pharmacy-locator", version)]
#[command(about = "Find pharmacies near a US ZIP code using OpenStreetMap data")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => LocatorConfig::load_from_path(Some(path))?,
        None => LocatorConfig::load()?,
    };
    init_tracing(&config.logging, cli.verbose)?;

    commands::handle_command(cli.command, &config).await
}
