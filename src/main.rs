// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "viewfinder")]
#[command(about = "Camera viewfinder coordinator")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    /// Configuration file (default: ~/.config/viewfinder/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session against the simulated camera
    Simulate {
        /// Start on the front lens regardless of configuration
        #[arg(long)]
        front: bool,

        /// Device orientation during the session (portrait, landscape-left, ...)
        #[arg(short, long, default_value = "portrait")]
        orientation: String,

        /// Number of photos to take
        #[arg(short, long, default_value = "1")]
        photos: usize,

        /// Flash button label to select before capturing
        #[arg(long)]
        flash: Option<String>,

        /// Latitude reported by the location source
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude reported by the location source
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Simulate a device without a usable camera
        #[arg(long)]
        unavailable: bool,
    },

    /// Print the effective configuration
    Config {
        /// Only print the configuration file path
        #[arg(long)]
        path: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=viewfinder=trace, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            front,
            orientation,
            photos,
            flash,
            lat,
            lon,
            unavailable,
        } => cli::simulate(cli::SimulateArgs {
            config: cli.config,
            front,
            orientation,
            photos,
            flash,
            location: lat.zip(lon),
            unavailable,
        }),
        Commands::Config { path } => cli::show_config(cli.config, path),
    };
    result?;
    Ok(())
}
