use anyhow::Result;
use clap::Args;

use crate::data_paths::DataPaths;
use crate::portfolio::display::{HoldingsFormatter, SummaryFormatter};
use crate::portfolio::service::PortfolioSnapshot;
use crate::portfolio::{Command, PortfolioStorage, SortDirection, SortKey};

#[derive(Args)]
pub struct ListArgs {
    /// Sort key
    #[arg(long, value_enum, default_value = "value")]
    pub sort: SortKey,

    /// Sort direction
    #[arg(long, value_enum, default_value = "desc")]
    pub order: SortDirection,
}

pub async fn execute(data_paths: DataPaths, args: ListArgs) -> Result<()> {
    let storage = PortfolioStorage::new(&data_paths);
    let mut portfolio = super::load_portfolio(&storage).await;

    portfolio.apply(Command::SetSorting {
        key: args.sort,
        direction: args.order,
    })?;

    let snapshot = PortfolioSnapshot {
        holdings: portfolio.holdings().to_vec(),
        total_value: portfolio.total_value(),
        total_change_24h: portfolio.total_change_24h(),
        is_loading: false,
    };

    print!("{}", HoldingsFormatter::new(portfolio.holdings()).format_table());
    print!("{}", SummaryFormatter::new(&snapshot).format());
    Ok(())
}
