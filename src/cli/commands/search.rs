use anyhow::Result;
use clap::Args;

use crate::coingecko::{CoinGeckoClient, PriceFeed};
use crate::data_paths::DataPaths;
use crate::portfolio::display::format_search_hits;

#[derive(Args)]
pub struct SearchArgs {
    /// Free-text query (name or symbol)
    pub query: String,
}

pub async fn execute(_data_paths: DataPaths, args: SearchArgs) -> Result<()> {
    let client = CoinGeckoClient::new()?;
    let hits = client.search(&args.query).await?;
    print!("{}", format_search_hits(&hits));
    Ok(())
}
