//! Portfolio tracking core
//!
//! - `store`: in-memory state and the command reducer
//! - `storage`: the on-disk persistence slot
//! - `service`: actor wiring the store to the periodic price refresh
//! - `display`: terminal formatters

pub mod display;
pub mod service;
pub mod storage;
pub mod store;
pub mod types;

pub use service::{start_portfolio_service, PortfolioHandle, PortfolioSnapshot};
pub use storage::PortfolioStorage;
pub use store::{Command, Portfolio};
pub use types::{Holding, SortDirection, SortKey};
