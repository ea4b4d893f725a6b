//! In-memory portfolio state and its command reducer
//!
//! All mutation flows through [`Portfolio::apply`] with a [`Command`]
//! variant; readers get immutable accessors. Aggregates (`total_value`,
//! `total_change_24h`) are recomputed after every command that touches
//! holdings or prices, so they are always exact sums over the current
//! holdings with no accumulation drift.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::types::{Holding, PortfolioExport, SortDirection, SortKey, EXPORT_VERSION};
use crate::coingecko::TokenQuote;
use crate::errors::PortfolioError;

/// Commands accepted by [`Portfolio::apply`]
#[derive(Debug, Clone)]
pub enum Command {
    /// Add `amount` of a token; merges into an existing holding by id
    AddToken { quote: TokenQuote, amount: Decimal },

    /// Remove the holding with this id; no-op when absent
    RemoveToken { id: String },

    /// Replace the held amount for this id; no-op when absent
    SetAmount { id: String, amount: Decimal },

    /// Merge fresh quotes into matching holdings
    UpdatePrices { quotes: Vec<TokenQuote> },

    /// Re-order the holdings list
    SetSorting {
        key: SortKey,
        direction: SortDirection,
    },

    /// Toggle the loading flag; no other state changes
    SetLoading { loading: bool },

    /// Replace the holdings list wholesale (restore/import)
    LoadHoldings { holdings: Vec<Holding> },
}

/// In-memory portfolio state
#[derive(Debug, Clone)]
pub struct Portfolio {
    /// Holdings in insertion order unless explicitly sorted
    holdings: Vec<Holding>,

    /// Σ holding.value
    total_value: Decimal,

    /// Σ (pct_change / 100) × value per holding
    total_change_24h: Decimal,

    /// True while a price refresh is in flight
    is_loading: bool,

    sort_key: SortKey,
    sort_direction: SortDirection,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            holdings: Vec::new(),
            total_value: Decimal::ZERO,
            total_change_24h: Decimal::ZERO,
            is_loading: false,
            sort_key: SortKey::Value,
            sort_direction: SortDirection::Desc,
        }
    }
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn get(&self, id: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.quote.id == id)
    }

    pub fn held_ids(&self) -> Vec<String> {
        self.holdings.iter().map(|h| h.quote.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn total_value(&self) -> Decimal {
        self.total_value
    }

    pub fn total_change_24h(&self) -> Decimal {
        self.total_change_24h
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn sorting(&self) -> (SortKey, SortDirection) {
        (self.sort_key, self.sort_direction)
    }

    /// Single mutation entry point
    pub fn apply(&mut self, command: Command) -> Result<(), PortfolioError> {
        match command {
            Command::AddToken { quote, amount } => self.add_token(quote, amount),
            Command::RemoveToken { id } => {
                self.remove_token(&id);
                Ok(())
            }
            Command::SetAmount { id, amount } => self.set_amount(&id, amount),
            Command::UpdatePrices { quotes } => {
                self.update_prices(&quotes);
                Ok(())
            }
            Command::SetSorting { key, direction } => {
                self.set_sorting(key, direction);
                Ok(())
            }
            Command::SetLoading { loading } => {
                self.is_loading = loading;
                Ok(())
            }
            Command::LoadHoldings { holdings } => {
                self.load_holdings(holdings);
                Ok(())
            }
        }
    }

    /// Serialize the current holdings as a portable snapshot. Pure.
    pub fn export(&self) -> serde_json::Result<String> {
        let export = PortfolioExport {
            tokens: self.holdings.clone(),
            exported_at: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        };
        serde_json::to_string_pretty(&export)
    }

    /// Replace the holdings from an exported snapshot.
    ///
    /// Malformed input (unparseable, or `tokens` missing / not an array of
    /// holdings) is discarded with a warning; state is left untouched.
    pub fn import(&mut self, data: &str) {
        let value: serde_json::Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to import portfolio: {}", e);
                return;
            }
        };

        let Some(tokens) = value.get("tokens").filter(|t| t.is_array()) else {
            warn!("Failed to import portfolio: missing 'tokens' array");
            return;
        };

        match serde_json::from_value::<Vec<Holding>>(tokens.clone()) {
            Ok(holdings) => {
                debug!("Imported {} holdings", holdings.len());
                self.load_holdings(holdings);
            }
            Err(e) => warn!("Failed to import portfolio: {}", e),
        }
    }

    fn add_token(&mut self, quote: TokenQuote, amount: Decimal) -> Result<(), PortfolioError> {
        if amount <= Decimal::ZERO {
            return Err(PortfolioError::InvalidAmount(amount));
        }

        if let Some(holding) = self.holdings.iter_mut().find(|h| h.quote.id == quote.id) {
            // Merge into the existing entry. Value tracks the stored price,
            // not whatever price the incoming quote carries.
            holding.amount += amount;
            holding.recompute_value();
            debug!(id = %quote.id, amount = %holding.amount, "Merged into existing holding");
        } else {
            debug!(id = %quote.id, %amount, "Added holding");
            self.holdings.push(Holding::new(quote, amount, Utc::now()));
        }

        self.recompute_aggregates();
        Ok(())
    }

    fn remove_token(&mut self, id: &str) {
        let before = self.holdings.len();
        self.holdings.retain(|h| h.quote.id != id);
        if self.holdings.len() == before {
            debug!(%id, "Remove ignored, token not held");
        }
        self.recompute_aggregates();
    }

    fn set_amount(&mut self, id: &str, amount: Decimal) -> Result<(), PortfolioError> {
        if amount < Decimal::ZERO {
            return Err(PortfolioError::InvalidAmount(amount));
        }

        if let Some(holding) = self.holdings.iter_mut().find(|h| h.quote.id == id) {
            holding.amount = amount;
            holding.recompute_value();
            self.recompute_aggregates();
        }
        Ok(())
    }

    fn update_prices(&mut self, quotes: &[TokenQuote]) {
        for holding in &mut self.holdings {
            if let Some(quote) = quotes.iter().find(|q| q.id == holding.quote.id) {
                holding.quote = quote.clone();
                holding.recompute_value();
            }
        }
        // Incoming quotes with no matching holding are dropped; holdings
        // with no incoming quote keep their last known prices.
        self.recompute_aggregates();
    }

    fn set_sorting(&mut self, key: SortKey, direction: SortDirection) {
        self.sort_key = key;
        self.sort_direction = direction;

        // Stable sort: equal keys keep their previous relative order.
        self.holdings.sort_by(|a, b| {
            let ordering = match key {
                SortKey::Value => a.value.cmp(&b.value),
                SortKey::Change => a
                    .quote
                    .price_change_percentage_24h
                    .cmp(&b.quote.price_change_percentage_24h),
                SortKey::Name => a
                    .quote
                    .name
                    .to_lowercase()
                    .cmp(&b.quote.name.to_lowercase()),
            };
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    fn load_holdings(&mut self, holdings: Vec<Holding>) {
        self.holdings = holdings;
        self.recompute_aggregates();
    }

    fn recompute_aggregates(&mut self) {
        self.total_value = self.holdings.iter().map(|h| h.value).sum();
        self.total_change_24h = self
            .holdings
            .iter()
            .map(|h| h.quote.price_change_percentage_24h / Decimal::ONE_HUNDRED * h.value)
            .sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(id: &str, name: &str, price: Decimal, change: Decimal) -> TokenQuote {
        TokenQuote {
            id: id.to_string(),
            symbol: id.chars().take(3).collect(),
            name: name.to_string(),
            image: String::new(),
            current_price: price,
            market_cap: Decimal::ZERO,
            market_cap_rank: None,
            price_change_percentage_24h: change,
            total_volume: Decimal::ZERO,
            circulating_supply: Decimal::ZERO,
            sparkline_in_7d: None,
        }
    }

    fn portfolio_with(entries: &[(&str, Decimal, Decimal)]) -> Portfolio {
        let mut portfolio = Portfolio::new();
        for (id, price, amount) in entries {
            portfolio
                .apply(Command::AddToken {
                    quote: quote(id, id, *price, Decimal::ZERO),
                    amount: *amount,
                })
                .unwrap();
        }
        portfolio
    }

    #[test]
    fn add_merges_instead_of_duplicating() {
        let mut portfolio = Portfolio::new();
        portfolio
            .apply(Command::AddToken {
                quote: quote("btc", "Bitcoin", dec!(100), dec!(0)),
                amount: dec!(3),
            })
            .unwrap();
        // Second add carries a different quoted price; the stored one wins.
        portfolio
            .apply(Command::AddToken {
                quote: quote("btc", "Bitcoin", dec!(999), dec!(0)),
                amount: dec!(2),
            })
            .unwrap();

        assert_eq!(portfolio.holdings().len(), 1);
        let holding = portfolio.get("btc").unwrap();
        assert_eq!(holding.amount, dec!(5));
        assert_eq!(holding.value, dec!(500));
        assert_eq!(portfolio.total_value(), dec!(500));
    }

    #[test]
    fn add_rejects_non_positive_amount() {
        let mut portfolio = Portfolio::new();
        let result = portfolio.apply(Command::AddToken {
            quote: quote("btc", "Bitcoin", dec!(100), dec!(0)),
            amount: dec!(0),
        });
        assert!(matches!(result, Err(PortfolioError::InvalidAmount(_))));
        assert!(portfolio.is_empty());

        let result = portfolio.apply(Command::AddToken {
            quote: quote("btc", "Bitcoin", dec!(100), dec!(0)),
            amount: dec!(-1),
        });
        assert!(matches!(result, Err(PortfolioError::InvalidAmount(_))));
        assert!(portfolio.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(1)), ("eth", dec!(10), dec!(2))]);
        portfolio
            .apply(Command::RemoveToken { id: "btc".into() })
            .unwrap();
        let after_first = portfolio.holdings().to_vec();
        let total_after_first = portfolio.total_value();

        portfolio
            .apply(Command::RemoveToken { id: "btc".into() })
            .unwrap();
        assert_eq!(portfolio.holdings(), after_first.as_slice());
        assert_eq!(portfolio.total_value(), total_after_first);
        assert_eq!(portfolio.total_value(), dec!(20));
    }

    #[test]
    fn set_amount_recomputes_from_stored_price() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(1))]);
        portfolio
            .apply(Command::SetAmount {
                id: "btc".into(),
                amount: dec!(2.5),
            })
            .unwrap();
        assert_eq!(portfolio.get("btc").unwrap().value, dec!(250.0));
        assert_eq!(portfolio.total_value(), dec!(250.0));
    }

    #[test]
    fn set_amount_zero_is_allowed_negative_is_not() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(1))]);
        portfolio
            .apply(Command::SetAmount {
                id: "btc".into(),
                amount: dec!(0),
            })
            .unwrap();
        assert_eq!(portfolio.total_value(), dec!(0));

        let result = portfolio.apply(Command::SetAmount {
            id: "btc".into(),
            amount: dec!(-0.1),
        });
        assert!(matches!(result, Err(PortfolioError::InvalidAmount(_))));
    }

    #[test]
    fn set_amount_unknown_id_is_noop() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(1))]);
        let before = portfolio.holdings().to_vec();
        portfolio
            .apply(Command::SetAmount {
                id: "doge".into(),
                amount: dec!(7),
            })
            .unwrap();
        assert_eq!(portfolio.holdings(), before.as_slice());
    }

    #[test]
    fn update_prices_is_exact_not_cumulative() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(2)), ("eth", dec!(10), dec!(5))]);

        let refresh = vec![
            quote("btc", "Bitcoin", dec!(110), dec!(10)),
            quote("eth", "Ethereum", dec!(9), dec!(-10)),
        ];
        // Applying the same quote set repeatedly must converge, not drift.
        for _ in 0..3 {
            portfolio
                .apply(Command::UpdatePrices {
                    quotes: refresh.clone(),
                })
                .unwrap();
        }

        assert_eq!(portfolio.total_value(), dec!(220) + dec!(45));
        // (10/100)*220 + (-10/100)*45
        assert_eq!(portfolio.total_change_24h(), dec!(22) - dec!(4.5));
    }

    #[test]
    fn update_prices_overwrites_all_quote_fields() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(2))]);
        let mut fresh = quote("btc", "Bitcoin", dec!(110), dec!(5));
        fresh.market_cap = dec!(12345);
        fresh.market_cap_rank = Some(1);

        portfolio
            .apply(Command::UpdatePrices {
                quotes: vec![fresh.clone()],
            })
            .unwrap();

        let holding = portfolio.get("btc").unwrap();
        assert_eq!(holding.quote, fresh);
        assert_eq!(holding.value, dec!(220));
    }

    #[test]
    fn update_prices_for_unheld_token_changes_nothing() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(2))]);
        let before = portfolio.holdings().to_vec();
        let total_before = portfolio.total_value();

        portfolio
            .apply(Command::UpdatePrices {
                quotes: vec![quote("xrp", "XRP", dec!(5), dec!(1))],
            })
            .unwrap();

        assert_eq!(portfolio.holdings(), before.as_slice());
        assert_eq!(portfolio.total_value(), total_before);
    }

    #[test]
    fn unmatched_holdings_keep_last_known_price() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(2)), ("eth", dec!(10), dec!(5))]);
        portfolio
            .apply(Command::UpdatePrices {
                quotes: vec![quote("btc", "Bitcoin", dec!(200), dec!(0))],
            })
            .unwrap();

        assert_eq!(portfolio.get("btc").unwrap().value, dec!(400));
        assert_eq!(portfolio.get("eth").unwrap().value, dec!(50));
        assert_eq!(portfolio.total_value(), dec!(450));
    }

    #[test]
    fn sort_by_value_both_directions() {
        let mut portfolio = portfolio_with(&[
            ("a", dec!(10), dec!(1)),
            ("b", dec!(30), dec!(1)),
            ("c", dec!(20), dec!(1)),
        ]);

        portfolio
            .apply(Command::SetSorting {
                key: SortKey::Value,
                direction: SortDirection::Asc,
            })
            .unwrap();
        let values: Vec<Decimal> = portfolio.holdings().iter().map(|h| h.value).collect();
        assert_eq!(values, vec![dec!(10), dec!(20), dec!(30)]);

        portfolio
            .apply(Command::SetSorting {
                key: SortKey::Value,
                direction: SortDirection::Desc,
            })
            .unwrap();
        let values: Vec<Decimal> = portfolio.holdings().iter().map(|h| h.value).collect();
        assert_eq!(values, vec![dec!(30), dec!(20), dec!(10)]);
    }

    #[test]
    fn sort_by_name_is_case_insensitive() {
        let mut portfolio = Portfolio::new();
        for (id, name) in [("z", "zcash"), ("b", "Bitcoin"), ("a", "aave")] {
            portfolio
                .apply(Command::AddToken {
                    quote: quote(id, name, dec!(1), dec!(0)),
                    amount: dec!(1),
                })
                .unwrap();
        }

        portfolio
            .apply(Command::SetSorting {
                key: SortKey::Name,
                direction: SortDirection::Asc,
            })
            .unwrap();
        let names: Vec<&str> = portfolio
            .holdings()
            .iter()
            .map(|h| h.quote.name.as_str())
            .collect();
        assert_eq!(names, vec!["aave", "Bitcoin", "zcash"]);
    }

    #[test]
    fn sort_ties_keep_insertion_order() {
        let mut portfolio = portfolio_with(&[
            ("first", dec!(10), dec!(1)),
            ("second", dec!(10), dec!(1)),
            ("third", dec!(5), dec!(1)),
        ]);

        portfolio
            .apply(Command::SetSorting {
                key: SortKey::Value,
                direction: SortDirection::Asc,
            })
            .unwrap();
        let ids: Vec<&str> = portfolio.holdings().iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec!["third", "first", "second"]);
    }

    #[test]
    fn export_import_round_trip() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(2)), ("eth", dec!(10), dec!(5))]);
        let exported = portfolio.export().unwrap();

        let mut restored = Portfolio::new();
        restored.import(&exported);

        assert_eq!(restored.holdings().len(), portfolio.holdings().len());
        assert_eq!(restored.total_value(), portfolio.total_value());
        assert_eq!(restored.total_change_24h(), portfolio.total_change_24h());
    }

    #[test]
    fn malformed_import_is_a_noop() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(2))]);
        let before = portfolio.holdings().to_vec();
        let total_before = portfolio.total_value();

        for bad in ["not json", "{}", r#"{"tokens": 42}"#, r#"{"tokens": [1, 2]}"#] {
            portfolio.import(bad);
            assert_eq!(portfolio.holdings(), before.as_slice(), "input: {}", bad);
            assert_eq!(portfolio.total_value(), total_before, "input: {}", bad);
        }
    }

    #[test]
    fn import_replaces_wholesale() {
        let mut source = portfolio_with(&[("eth", dec!(10), dec!(5))]);
        let exported = source.export().unwrap();

        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(2))]);
        portfolio.import(&exported);

        assert_eq!(portfolio.holdings().len(), 1);
        assert!(portfolio.get("btc").is_none());
        assert_eq!(portfolio.total_value(), dec!(50));
    }

    #[test]
    fn set_loading_touches_only_the_flag() {
        let mut portfolio = portfolio_with(&[("btc", dec!(100), dec!(2))]);
        let before = portfolio.holdings().to_vec();

        portfolio
            .apply(Command::SetLoading { loading: true })
            .unwrap();
        assert!(portfolio.is_loading());
        assert_eq!(portfolio.holdings(), before.as_slice());

        portfolio
            .apply(Command::SetLoading { loading: false })
            .unwrap();
        assert!(!portfolio.is_loading());
    }

    #[test]
    fn change_aggregate_is_amount_weighted() {
        let mut portfolio = Portfolio::new();
        portfolio
            .apply(Command::AddToken {
                quote: quote("btc", "Bitcoin", dec!(50), dec!(4)),
                amount: dec!(2),
            })
            .unwrap();

        // value = 100, change = (4/100) * 100
        assert_eq!(portfolio.total_change_24h(), dec!(4.00));
    }
}
