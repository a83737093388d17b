//! stocksync CLI
//!
//! Scrapes storefront stock levels and pushes them to the inventory API.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use stocksync::{
    error::Result,
    models::{Config, Credentials, JoinMode},
    pipeline,
};

/// stocksync - Storefront stock scraper and inventory sync
#[derive(Parser, Debug)]
#[command(
    name = "stocksync",
    version,
    about = "Storefront stock scraper and inventory sync"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape stock levels and push updates to the inventory API
    Sync {
        /// Attribute listings are matched on
        #[arg(long, value_enum, default_value_t = JoinArg::Character)]
        join: JoinArg,
    },

    /// Validate the configuration file
    Validate,
}

/// CLI spelling of [`JoinMode`].
#[derive(ValueEnum, Debug, Clone, Copy)]
enum JoinArg {
    /// Match on the product display name
    Character,
    /// Match on the storefront reference id
    RefId,
}

impl From<JoinArg> for JoinMode {
    fn from(arg: JoinArg) -> Self {
        match arg {
            JoinArg::Character => JoinMode::Character,
            JoinArg::RefId => JoinMode::RefId,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Sync { join } => {
            config.validate()?;
            let credentials = Credentials::from_env()?;
            pipeline::run_sync(&config, &credentials, join.into()).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK.");
        }
    }

    Ok(())
}
