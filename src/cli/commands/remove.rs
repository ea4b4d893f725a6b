use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use crate::data_paths::DataPaths;
use crate::portfolio::{Command, PortfolioStorage};

#[derive(Args)]
pub struct RemoveArgs {
    /// CoinGecko token id to remove
    pub id: String,
}

pub async fn execute(data_paths: DataPaths, args: RemoveArgs) -> Result<()> {
    let storage = PortfolioStorage::new(&data_paths);
    let mut portfolio = super::load_portfolio(&storage).await;

    let was_held = portfolio.get(&args.id).is_some();
    portfolio.apply(Command::RemoveToken {
        id: args.id.clone(),
    })?;
    storage.save(portfolio.holdings()).await?;

    if was_held {
        println!("{} {}", "Removed".green(), args.id);
        println!("Portfolio value: ${:.2}", portfolio.total_value());
    } else {
        println!("Token '{}' is not in the portfolio", args.id);
    }
    Ok(())
}
