//! Print dashboard views of the listing file as JSON
//!
//! Usage:
//!   rentmap_report map --min-price 1500 --max-price 3000 --district Krowodrza
//!   rentmap_report stats --pretty
//!   rentmap_report without-coords --data data/oferty_geo.csv
//!   rentmap_report deals --config config/rentmap.toml

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use rentmap::{Config, Dashboard, DashboardPayload, FilterCriteria};

#[derive(Parser)]
#[command(name = "rentmap_report")]
#[command(about = "Rental listing map, statistics and best deals as JSON")]
struct Cli {
    /// Config file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<String>,
    /// Listing file, overriding `data_path` from the config
    #[arg(long, global = true)]
    data: Option<String>,
    #[arg(long, global = true)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Markers for the filtered listings
    Map {
        #[arg(long, default_value = "")]
        min_price: String,
        #[arg(long, default_value = "")]
        max_price: String,
        #[arg(long, default_value = "")]
        district: String,
    },
    /// Statistics over listings with coordinates
    Stats,
    /// Listings that cannot be placed on the map
    WithoutCoords,
    /// Best value listings by total price per m²
    Deals,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize view")?;
    println!("{}", out);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    let dashboard = match Dashboard::load(config) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            print_json(&DashboardPayload::failed(e.user_message()), cli.pretty)?;
            bail!("{}", e);
        }
    };

    match cli.command {
        Commands::Map {
            min_price,
            max_price,
            district,
        } => {
            let criteria = FilterCriteria::from_inputs(&min_price, &max_price, &district);
            print_json(&dashboard.map_view(&criteria), cli.pretty)?;
        }
        Commands::Stats => print_json(&dashboard.statistics_view(), cli.pretty)?,
        Commands::WithoutCoords => print_json(&dashboard.without_coordinates_view(), cli.pretty)?,
        Commands::Deals => print_json(&dashboard.best_deals(), cli.pretty)?,
    }

    Ok(())
}
