//! Tenor CLI - command line front end of the term-structure Monte Carlo engine.
//!
//! # Commands
//!
//! - `tenor check` - validate a configuration and print the model dimensions
//! - `tenor price` - simulate and value a standard set of products
//!
//! Both commands read a TOML [`SimulationConfig`] (default `tenor.toml`) and
//! seed the model from a flat forward curve given on the command line.
//! Set `RUST_LOG=info` to see the engine's progress logs.

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tenor_pricing::mc::SimulationConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

pub use error::{CliError, Result};

/// Term-structure Monte Carlo pricing CLI
#[derive(Parser)]
#[command(name = "tenor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "tenor.toml")]
    config: String,

    /// Simple-compounded forward rate of the flat initial curve
    #[arg(long, global = true, default_value = "0.05", allow_hyphen_values = true)]
    forward: f64,

    /// Compounding period of the flat initial curve
    #[arg(long, global = true, default_value = "0.5")]
    curve_period: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value bonds, a par swap, a caplet and swaptions on the configured model
    Price {
        /// Override the number of Monte Carlo paths
        #[arg(short = 'n', long)]
        num_paths: Option<usize>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Validate the configuration and print the model dimensions
    Check,
}

fn main() -> anyhow::Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config = SimulationConfig::from_file(Path::new(&cli.config))
        .with_context(|| format!("loading configuration from {}", cli.config))?;

    match cli.command {
        Commands::Price { num_paths, format } => {
            let format: commands::price::OutputFormat = format.parse()?;
            commands::price::run(&config, cli.forward, cli.curve_period, num_paths, format)
                .context("price command failed")?
        }
        Commands::Check => {
            commands::check::run(&config, cli.forward, cli.curve_period).context("configuration check failed")?
        }
    }
    Ok(())
}
