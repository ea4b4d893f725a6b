//! CoinGecko API client implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use super::types::*;
use crate::errors::FeedError;

/// Base URL for the public CoinGecko REST API
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimum spacing between outbound calls (public API rate limit)
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on returned search hits
const SEARCH_RESULT_LIMIT: usize = 10;

/// Read-only price feed operations used by the portfolio core.
///
/// Injected as a trait object so tests can substitute a fake feed.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Search for tokens by free text, bounded to 10 hits
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Fetch market quotes for the given identifiers in one batch
    async fn get_quotes(&self, ids: &[String]) -> Result<Vec<TokenQuote>>;

    /// Look a token up by contract address on a platform
    async fn get_quote_by_contract(
        &self,
        address: &str,
        platform: &str,
    ) -> Result<Option<TokenQuote>>;

    /// Top tokens by market cap, shown while the portfolio is empty
    async fn get_trending(&self) -> Result<Vec<TokenQuote>>;
}

/// CoinGecko API client
pub struct CoinGeckoClient {
    /// HTTP client
    client: Client,

    /// API base URL
    base_url: String,

    /// Minimum spacing between requests
    min_request_interval: Duration,

    /// Completion time of the most recent request
    last_request: Mutex<Option<Instant>>,
}

impl CoinGeckoClient {
    /// Create a client against the public API
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            min_request_interval: MIN_REQUEST_INTERVAL,
            last_request: Mutex::new(None),
        })
    }

    /// Override the request spacing (used by tests)
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    /// Delay until at least the minimum interval has passed since the last
    /// request. The lock is held across the sleep so concurrent callers
    /// queue up instead of racing the same window; requests are delayed,
    /// never dropped.
    async fn throttle(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_request_interval {
                tokio::time::sleep(self.min_request_interval - elapsed).await;
            }
        }
        *last_request = Some(Instant::now());
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FeedError> {
        self.throttle().await;

        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            debug!("CoinGecko error - Status: {}, Body: {}", status, body);
            return Err(FeedError::Api { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PriceFeed for CoinGeckoClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let response: SearchResponse = self
            .get_json("/search", &[("query", query.to_string())])
            .await
            .context("Token search failed")?;

        let mut hits = response.coins;
        hits.truncate(SEARCH_RESULT_LIMIT);
        debug!("Search '{}' returned {} hits", query, hits.len());
        Ok(hits)
    }

    async fn get_quotes(&self, ids: &[String]) -> Result<Vec<TokenQuote>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let quotes: Vec<TokenQuote> = self
            .get_json(
                "/coins/markets",
                &[
                    ("vs_currency", "usd".to_string()),
                    ("ids", ids.join(",")),
                    ("order", "market_cap_desc".to_string()),
                    ("per_page", "100".to_string()),
                    ("page", "1".to_string()),
                    ("sparkline", "true".to_string()),
                    ("price_change_percentage", "24h".to_string()),
                ],
            )
            .await
            .context("Market quote request failed")?;

        info!("Fetched {} quotes for {} requested ids", quotes.len(), ids.len());
        Ok(quotes)
    }

    async fn get_quote_by_contract(
        &self,
        address: &str,
        platform: &str,
    ) -> Result<Option<TokenQuote>> {
        let path = format!("/coins/{}/contract/{}", platform, address);

        match self.get_json::<ContractCoin>(&path, &[]).await {
            Ok(coin) => Ok(Some(coin.into())),
            Err(FeedError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e).context("Contract lookup failed"),
        }
    }

    async fn get_trending(&self) -> Result<Vec<TokenQuote>> {
        let quotes: Vec<TokenQuote> = self
            .get_json(
                "/coins/markets",
                &[
                    ("vs_currency", "usd".to_string()),
                    ("order", "market_cap_desc".to_string()),
                    ("per_page", "20".to_string()),
                    ("page", "1".to_string()),
                    ("sparkline", "true".to_string()),
                ],
            )
            .await
            .context("Trending request failed")?;

        Ok(quotes)
    }
}
