use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};

use pharmacy_locator::api::AppState;
use pharmacy_locator::view::RenderSettings;
use pharmacy_locator::{
    Geocoder, LocatorConfig, NominatimClient, OverpassClient, PlaceSearch, SearchController,
    SnapshotView, TerminalView, web,
};

#[derive(Subcommand)]
pub enum Commands {
    /// Search once and print the results
    Search {
        /// Five digit ZIP code
        #[arg(short, long)]
        zip: String,
        /// Search radius in miles
        #[arg(short, long)]
        radius: Option<f64>,
        /// Print the rendered view as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Read "ZIP [RADIUS]" lines from stdin and search for each
    Interactive {
        /// Radius in miles for lines that give none
        #[arg(short, long)]
        radius: Option<f64>,
    },
    /// Serve the JSON search API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn clients(config: &LocatorConfig) -> Result<(Arc<dyn Geocoder>, Arc<dyn PlaceSearch>)> {
    let geocoder = NominatimClient::new(config).context("Failed to create geocoding client")?;
    let places = OverpassClient::new(config).context("Failed to create places client")?;
    Ok((Arc::new(geocoder), Arc::new(places)))
}

/// Split an interactive line into a ZIP code and a radius. A radius that
/// does not parse is passed on as NaN so the controller reports it.
fn parse_line(line: &str, default_radius: f64) -> Option<(String, f64)> {
    let mut parts = line.split_whitespace();
    let zip = parts.next()?.to_string();
    let radius = parts
        .next()
        .map(|r| r.parse::<f64>().unwrap_or(f64::NAN))
        .unwrap_or(default_radius);
    Some((zip, radius))
}

pub async fn handle_command(command: Commands, config: &LocatorConfig) -> Result<ExitCode> {
    let settings = RenderSettings::from(&config.map);
    let (geocoder, places) = clients(config)?;

    match command {
        Commands::Search { zip, radius, json } => {
            let radius = radius.unwrap_or(config.defaults.radius_miles);

            let outcome = if json {
                let controller =
                    SearchController::new(geocoder, places, SnapshotView::default(), settings);
                let outcome = controller.submit(&zip, radius).await;
                let view = controller.into_view();
                println!("{}", serde_json::to_string_pretty(&view)?);
                outcome
            } else {
                let controller =
                    SearchController::new(geocoder, places, TerminalView::stdout(), settings);
                controller.submit(&zip, radius).await
            };

            Ok(if outcome.is_rendered() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Interactive { radius } => {
            let default_radius = radius.unwrap_or(config.defaults.radius_miles);
            let controller =
                SearchController::new(geocoder, places, TerminalView::stdout(), settings);

            println!("Enter a ZIP code and optional radius in miles (blank line or \"quit\" to exit)");
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let line = line.trim();
                if line.is_empty() || line.eq_ignore_ascii_case("quit") {
                    break;
                }
                if let Some((zip, radius)) = parse_line(line, default_radius) {
                    controller.submit(&zip, radius).await;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Serve { port } => {
            let state = AppState {
                geocoder,
                places,
                settings,
                default_radius_miles: config.defaults.radius_miles,
            };
            web::run(state, port.unwrap_or(config.server.port)).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
