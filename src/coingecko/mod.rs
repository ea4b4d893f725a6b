//! CoinGecko price feed integration
//!
//! The portfolio core only sees the [`PriceFeed`] trait; [`CoinGeckoClient`]
//! is the production implementation against the public REST API.

mod client;
mod types;

pub use client::{CoinGeckoClient, PriceFeed, DEFAULT_BASE_URL};
pub use types::{SearchHit, Sparkline, TokenQuote};
