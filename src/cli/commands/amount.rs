use anyhow::{bail, Result};
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use crate::cli::parse_amount;
use crate::data_paths::DataPaths;
use crate::portfolio::{Command, PortfolioStorage};

#[derive(Args)]
pub struct AmountArgs {
    /// CoinGecko token id
    pub id: String,

    /// New held quantity (zero keeps the token with no position)
    #[arg(value_parser = parse_amount)]
    pub amount: Decimal,
}

pub async fn execute(data_paths: DataPaths, args: AmountArgs) -> Result<()> {
    if args.amount < Decimal::ZERO {
        bail!("Amount must not be negative, got {}", args.amount);
    }

    let storage = PortfolioStorage::new(&data_paths);
    let mut portfolio = super::load_portfolio(&storage).await;

    if portfolio.get(&args.id).is_none() {
        bail!(
            "Token '{}' is not in the portfolio, use 'coinfolio add' first",
            args.id
        );
    }

    portfolio.apply(Command::SetAmount {
        id: args.id.clone(),
        amount: args.amount,
    })?;
    storage.save(portfolio.holdings()).await?;

    if let Some(holding) = portfolio.get(&args.id) {
        println!(
            "{} {} to {:.4} — value ${:.2}",
            "Updated".green(),
            args.id,
            holding.amount,
            holding.value
        );
    }
    println!("Portfolio value: ${:.2}", portfolio.total_value());
    Ok(())
}
