mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tripmap_core::config::CatalogConfig;

/// tripmap: catalog a trip photo archive
#[derive(Parser)]
#[command(name = "tripmap", version, about)]
struct Cli {
    /// Archive root holding one directory per trip
    #[arg(long, default_value = "trips")]
    root: PathBuf,

    /// JSON config file (fields not given keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker threads for the build (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Zoom for sub-location groups whose descriptor has none
    #[arg(long)]
    default_zoom: Option<f64>,

    /// Fail the build if it takes longer than this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all trips
    Trips {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the locations of a trip
    Locations {
        /// Trip label, e.g. "Catalonia, Spain (2022)"
        trip: String,
        /// Show the sub-locations of this location instead
        location: Option<String>,
    },
    /// Print the media paths of a location or sub-location
    Media {
        /// Trip label
        trip: String,
        /// Location name
        location: String,
        /// Sub-location name (required for locations split into sub-locations)
        sub_location: Option<String>,
    },
    /// Show who attended which trip
    Members {
        /// Only list the trips attended by this person
        #[arg(long)]
        person: Option<String>,
    },
    /// Print the catalog fingerprint
    Fingerprint,
}

fn load_config(cli: &Cli) -> Result<CatalogConfig> {
    let mut config = match &cli.config {
        Some(path) => CatalogConfig::from_file(path)?,
        None => CatalogConfig::default(),
    };
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(zoom) = cli.default_zoom {
        config.default_group_zoom = Some(zoom);
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = Some(secs);
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let archive = commands::open_archive(&cli.root, &config)?;

    match cli.command {
        Commands::Trips { json } => commands::trips::run(&archive, json)?,
        Commands::Locations { trip, location } => {
            commands::locations::run(&archive, &trip, location.as_deref())?
        }
        Commands::Media {
            trip,
            location,
            sub_location,
        } => commands::media::run(&archive, &trip, &location, sub_location.as_deref())?,
        Commands::Members { person } => commands::members::run(&archive, person.as_deref())?,
        Commands::Fingerprint => println!("{}", archive.catalog.fingerprint()?),
    }

    Ok(())
}
