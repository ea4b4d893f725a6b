use anyhow::{bail, Result};
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::cli::parse_amount;
use crate::coingecko::{CoinGeckoClient, PriceFeed};
use crate::data_paths::DataPaths;
use crate::portfolio::{Command, PortfolioStorage};

#[derive(Args)]
pub struct AddArgs {
    /// CoinGecko token id (e.g. "bitcoin")
    pub id: String,

    /// Quantity to add (must be positive)
    #[arg(value_parser = parse_amount)]
    pub amount: Decimal,
}

pub async fn execute(data_paths: DataPaths, args: AddArgs) -> Result<()> {
    // Pre-validate before touching the store
    if args.amount <= Decimal::ZERO {
        bail!("Amount must be positive, got {}", args.amount);
    }

    let storage = PortfolioStorage::new(&data_paths);
    let mut portfolio = super::load_portfolio(&storage).await;

    let client = CoinGeckoClient::new()?;
    let quotes = client.get_quotes(&[args.id.clone()]).await?;
    let Some(quote) = quotes.into_iter().next() else {
        bail!("Token '{}' not found on CoinGecko", args.id);
    };

    let name = quote.name.clone();
    portfolio.apply(Command::AddToken {
        quote,
        amount: args.amount,
    })?;
    storage.save(portfolio.holdings()).await?;

    if let Some(holding) = portfolio.get(&args.id) {
        println!(
            "{} {} {} — now holding {:.4}, value ${:.2}",
            "Added".green(),
            args.amount,
            name,
            holding.amount,
            holding.value
        );
    }
    println!("Portfolio value: ${:.2}", portfolio.total_value());
    Ok(())
}
