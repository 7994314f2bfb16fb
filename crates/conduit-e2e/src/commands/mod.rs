use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conduit_e2e_core::config::{Config, ConfigOverrides, get_config};

use crate::log::setup_logging;

pub mod list;
pub mod run;

/// conduit-e2e - end-to-end scenarios for a Conduit REST API.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write debug logs, including every request, to the data directory.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the default one.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scenarios selected by the spec pattern.
    Run {
        /// Glob over scenario files, e.g. "api/*". Overrides the config.
        #[arg(short, long)]
        spec: Option<String>,
        /// Root URL of the API under test. Overrides the config.
        #[arg(long)]
        base_url: Option<String>,
        /// Namespace for generated users and articles. Overrides the config.
        #[arg(long)]
        prefix: Option<String>,
    },
    /// List the scenarios selected by the spec pattern without running them.
    List {
        /// Glob over scenario files, e.g. "e2e/*". Overrides the config.
        #[arg(short, long)]
        spec: Option<String>,
    },
}

/// Loads the config file and applies command line overrides.
pub fn load_config(path: Option<PathBuf>, overrides: ConfigOverrides) -> Result<Config> {
    let config = get_config(path).context("Failed to load configuration")?;
    config
        .with_overrides(overrides)
        .context("Invalid command line override")
}

pub async fn run_app() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    match cli.command {
        Commands::Run {
            spec,
            base_url,
            prefix,
        } => {
            let config = load_config(
                cli.config,
                ConfigOverrides {
                    base_url,
                    prefix,
                    spec_pattern: spec,
                },
            )?;
            run::execute(&config).await
        }
        Commands::List { spec } => {
            let config = load_config(
                cli.config,
                ConfigOverrides {
                    spec_pattern: spec,
                    ..Default::default()
                },
            )?;
            list::execute(&config)
        }
    }
}
