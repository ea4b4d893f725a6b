use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::data_paths::DataPaths;
use crate::portfolio::PortfolioStorage;

#[derive(Args)]
pub struct ExportArgs {
    /// Destination file; stdout when omitted
    pub output: Option<PathBuf>,
}

pub async fn execute(data_paths: DataPaths, args: ExportArgs) -> Result<()> {
    let storage = PortfolioStorage::new(&data_paths);
    let portfolio = super::load_portfolio(&storage).await;

    let snapshot = portfolio.export().context("Failed to serialize portfolio")?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, &snapshot)
                .await
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!(
                "{} {} holdings to {:?}",
                "Exported".green(),
                portfolio.holdings().len(),
                path
            );
        }
        None => println!("{}", snapshot),
    }
    Ok(())
}
