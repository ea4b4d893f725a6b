//! Type definitions for CoinGecko API responses

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Market quote for a single token, as returned by `/coins/markets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenQuote {
    /// CoinGecko identifier, globally unique (e.g. "bitcoin")
    pub id: String,

    /// Ticker symbol (e.g. "btc")
    pub symbol: String,

    /// Display name
    pub name: String,

    /// Logo URL
    #[serde(default)]
    pub image: String,

    /// Current price in the feed currency (USD)
    #[serde(default, deserialize_with = "null_to_zero")]
    pub current_price: Decimal,

    /// Market capitalization
    #[serde(default, deserialize_with = "null_to_zero")]
    pub market_cap: Decimal,

    /// Rank by market capitalization, absent for obscure tokens
    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    /// Signed 24h price change in percent
    #[serde(default, deserialize_with = "null_to_zero")]
    pub price_change_percentage_24h: Decimal,

    /// 24h trading volume
    #[serde(default, deserialize_with = "null_to_zero")]
    pub total_volume: Decimal,

    /// Circulating supply
    #[serde(default, deserialize_with = "null_to_zero")]
    pub circulating_supply: Decimal,

    /// 7-day price series, oldest first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparkline_in_7d: Option<Sparkline>,
}

/// 7-day price series attached to a market quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<Decimal>,
}

/// One hit from the `/search` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub symbol: String,

    /// Thumbnail URL
    #[serde(default)]
    pub thumb: String,

    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

/// Envelope around `/search` responses
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchHit>,
}

/// `/coins/{platform}/contract/{address}` response, which nests market data
/// under per-currency maps instead of the flat markets shape.
#[derive(Debug, Deserialize)]
pub(crate) struct ContractCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<ContractImage>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub market_data: Option<ContractMarketData>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContractImage {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub thumb: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContractMarketData {
    #[serde(default)]
    pub current_price: CurrencyMap,
    #[serde(default)]
    pub market_cap: CurrencyMap,
    #[serde(default, deserialize_with = "null_to_zero")]
    pub price_change_percentage_24h: Decimal,
    #[serde(default)]
    pub total_volume: CurrencyMap,
    #[serde(default, deserialize_with = "null_to_zero")]
    pub circulating_supply: Decimal,
}

/// Per-currency value map; only USD is consulted
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CurrencyMap {
    #[serde(default, deserialize_with = "null_to_zero")]
    pub usd: Decimal,
}

impl From<ContractCoin> for TokenQuote {
    fn from(coin: ContractCoin) -> Self {
        let image = coin
            .image
            .and_then(|i| i.small.or(i.thumb))
            .unwrap_or_default();
        let market_data = coin.market_data.unwrap_or_default();
        Self {
            id: coin.id,
            symbol: coin.symbol,
            name: coin.name,
            image,
            current_price: market_data.current_price.usd,
            market_cap: market_data.market_cap.usd,
            market_cap_rank: coin.market_cap_rank,
            price_change_percentage_24h: market_data.price_change_percentage_24h,
            total_volume: market_data.total_volume.usd,
            circulating_supply: market_data.circulating_supply,
            sparkline_in_7d: None,
        }
    }
}

/// CoinGecko sends explicit `null` for numeric fields it has no data for.
fn null_to_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Decimal>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
