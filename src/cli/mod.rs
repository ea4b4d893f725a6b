//! CLI module for coinfolio
//!
//! Uses clap for argument parsing with one module per subcommand. Single-shot
//! commands load the persistence slot, apply one store command, persist, and
//! render; `watch` runs the portfolio service with the periodic refresh.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod args;
pub mod commands;

pub use args::parse_amount;
use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::logging::{self, LogMode, LoggingConfig};

use commands::add::AddArgs;
use commands::amount::AmountArgs;
use commands::contract::ContractArgs;
use commands::export::ExportArgs;
use commands::import::ImportArgs;
use commands::list::ListArgs;
use commands::manifest::ManifestArgs;
use commands::remove::RemoveArgs;
use commands::search::SearchArgs;
use commands::trending::TrendingArgs;
use commands::watch::WatchArgs;

#[derive(Parser)]
#[command(name = "coinfolio")]
#[command(version)]
#[command(about = "Track a cryptocurrency portfolio from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search CoinGecko for tokens
    Search(SearchArgs),

    /// Show top tokens by market cap
    Trending(TrendingArgs),

    /// Add a token to the portfolio
    Add(AddArgs),

    /// Remove a token from the portfolio
    Remove(RemoveArgs),

    /// Set the held amount for a token
    Amount(AmountArgs),

    /// List holdings and portfolio totals
    List(ListArgs),

    /// Look a token up by contract address
    Contract(ContractArgs),

    /// Export the portfolio to a JSON snapshot
    Export(ExportArgs),

    /// Import a previously exported snapshot
    Import(ImportArgs),

    /// Watch the portfolio with live price refresh
    Watch(WatchArgs),

    /// Print the host-platform manifest
    Manifest(ManifestArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let data_paths = DataPaths::new(&self.data_dir);
        data_paths.ensure_directories()?;

        // watch owns the terminal, so its logs go to file only
        let mode = match self.command {
            Commands::Watch(_) => LogMode::FileOnly,
            _ => LogMode::ConsoleAndFile,
        };
        logging::init_logging(LoggingConfig::new(mode, data_paths.clone(), self.verbose))?;

        match self.command {
            Commands::Search(args) => commands::search::execute(data_paths, args).await,
            Commands::Trending(args) => commands::trending::execute(data_paths, args).await,
            Commands::Add(args) => commands::add::execute(data_paths, args).await,
            Commands::Remove(args) => commands::remove::execute(data_paths, args).await,
            Commands::Amount(args) => commands::amount::execute(data_paths, args).await,
            Commands::List(args) => commands::list::execute(data_paths, args).await,
            Commands::Contract(args) => commands::contract::execute(data_paths, args).await,
            Commands::Export(args) => commands::export::execute(data_paths, args).await,
            Commands::Import(args) => commands::import::execute(data_paths, args).await,
            Commands::Watch(args) => commands::watch::execute(data_paths, args).await,
            Commands::Manifest(args) => commands::manifest::execute(data_paths, args).await,
        }
    }
}
