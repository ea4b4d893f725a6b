use anyhow::Result;
use clap::Args;

use crate::coingecko::{CoinGeckoClient, PriceFeed};
use crate::data_paths::DataPaths;
use crate::portfolio::display::format_quotes;

#[derive(Args)]
pub struct ContractArgs {
    /// Token contract address
    pub address: String,

    /// Asset platform the contract lives on
    #[arg(long, default_value = "ethereum")]
    pub platform: String,
}

pub async fn execute(_data_paths: DataPaths, args: ContractArgs) -> Result<()> {
    let client = CoinGeckoClient::new()?;
    match client
        .get_quote_by_contract(&args.address, &args.platform)
        .await?
    {
        Some(quote) => print!("{}", format_quotes(&[quote])),
        None => println!(
            "No token found for contract {} on {}",
            args.address, args.platform
        ),
    }
    Ok(())
}
