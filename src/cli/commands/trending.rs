use anyhow::Result;
use clap::Args;

use crate::coingecko::{CoinGeckoClient, PriceFeed};
use crate::data_paths::DataPaths;
use crate::portfolio::display::format_quotes;

#[derive(Args)]
pub struct TrendingArgs {}

pub async fn execute(_data_paths: DataPaths, _args: TrendingArgs) -> Result<()> {
    let client = CoinGeckoClient::new()?;
    let quotes = client.get_trending().await?;
    print!("{}", format_quotes(&quotes));
    Ok(())
}
