//! Portfolio type definitions

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coingecko::TokenQuote;

/// Version stamped into exported snapshots
pub const EXPORT_VERSION: &str = "1.0";

/// A held token: the latest market quote plus the user's quantity.
///
/// `value` is derived (`amount` × current price) but stored alongside, the
/// same shape the persistence slot and export format carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(flatten)]
    pub quote: TokenQuote,

    /// User-held quantity
    pub amount: Decimal,

    /// Derived `amount` × current price
    pub value: Decimal,

    /// Timestamp of first acquisition
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}

impl Holding {
    pub fn new(quote: TokenQuote, amount: Decimal, added_at: DateTime<Utc>) -> Self {
        let value = amount * quote.current_price;
        Self {
            quote,
            amount,
            value,
            added_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.quote.id
    }

    pub(crate) fn recompute_value(&mut self) {
        self.value = self.amount * self.quote.current_price;
    }
}

/// Sort key for the holdings list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Value,
    Change,
    Name,
}

/// Sort direction for the holdings list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// On-disk shape of the persistence slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPortfolio {
    pub tokens: Vec<Holding>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

/// Envelope produced by `export` and accepted by `import`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioExport {
    pub tokens: Vec<Holding>,
    #[serde(rename = "exportedAt")]
    pub exported_at: DateTime<Utc>,
    pub version: String,
}
