use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::data_paths::DataPaths;
use crate::portfolio::PortfolioStorage;

#[derive(Args)]
pub struct ImportArgs {
    /// Snapshot file produced by 'coinfolio export'
    pub input: PathBuf,
}

pub async fn execute(data_paths: DataPaths, args: ImportArgs) -> Result<()> {
    let storage = PortfolioStorage::new(&data_paths);
    let mut portfolio = super::load_portfolio(&storage).await;
    let holdings_before = portfolio.holdings().to_vec();

    let data = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read {:?}", args.input))?;

    portfolio.import(&data);

    if portfolio.holdings() == holdings_before.as_slice() {
        println!("Nothing imported, portfolio unchanged (see log for details)");
        return Ok(());
    }

    storage.save(portfolio.holdings()).await?;
    println!(
        "{} {} holdings — portfolio value ${:.2}",
        "Imported".green(),
        portfolio.holdings().len(),
        portfolio.total_value()
    );
    Ok(())
}
