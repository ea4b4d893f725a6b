use anyhow::Result;
use chrono::Local;
use clap::Args;
use owo_colors::OwoColorize;
use std::sync::Arc;
use tokio::time::{interval, Duration};

use crate::coingecko::{CoinGeckoClient, PriceFeed};
use crate::data_paths::DataPaths;
use crate::portfolio::display::{format_quotes, HoldingsFormatter, SummaryFormatter};
use crate::portfolio::{start_portfolio_service, PortfolioStorage};

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between automatic price refreshes
    #[arg(long, default_value = "30")]
    pub interval: u64,
}

pub async fn execute(data_paths: DataPaths, args: WatchArgs) -> Result<()> {
    let storage = PortfolioStorage::new(&data_paths);
    let client = Arc::new(CoinGeckoClient::new()?);

    let handle = start_portfolio_service(
        storage,
        client.clone(),
        Duration::from_secs(args.interval.max(1)),
    );

    // Shown once instead of the dashboard while nothing is held
    let initial = handle.snapshot().await?;
    if initial.holdings.is_empty() {
        println!("Portfolio is empty. Popular tokens:");
        match client.get_trending().await {
            Ok(quotes) => print!("{}", format_quotes(&quotes)),
            Err(e) => println!("(trending unavailable: {})", e),
        }
        println!("Add a token with 'coinfolio add <id> <amount>', watching for changes...");
    }

    let mut ticker = interval(Duration::from_secs(args.interval.max(1)));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                break;
            }
            _ = ticker.tick() => {
                let snapshot = handle.snapshot().await?;
                if snapshot.holdings.is_empty() {
                    continue;
                }
                println!();
                println!("{} {}", "Portfolio".bold(), Local::now().format("%H:%M:%S"));
                print!("{}", HoldingsFormatter::new(&snapshot.holdings).format_table());
                print!("{}", SummaryFormatter::new(&snapshot).format());
            }
        }
    }

    handle.shutdown().await?;
    println!("\nStopped.");
    Ok(())
}
