//! CLI command implementations

pub mod add;
pub mod amount;
pub mod contract;
pub mod export;
pub mod import;
pub mod list;
pub mod manifest;
pub mod remove;
pub mod search;
pub mod trending;
pub mod watch;

use crate::portfolio::{Command, Portfolio, PortfolioStorage};

/// Load the persistence slot into a fresh store
pub(crate) async fn load_portfolio(storage: &PortfolioStorage) -> Portfolio {
    let holdings = storage.load().await;
    let mut portfolio = Portfolio::new();
    let _ = portfolio.apply(Command::LoadHoldings { holdings });
    portfolio
}
