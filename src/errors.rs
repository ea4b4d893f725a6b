//! Domain error types

use rust_decimal::Decimal;

/// Errors raised by portfolio store commands
#[derive(Debug, thiserror::Error)]
pub enum PortfolioError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),
}

/// Errors raised by the price feed client
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
