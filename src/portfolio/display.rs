//! Portfolio display utilities and formatters

use owo_colors::OwoColorize;
use rust_decimal::Decimal;

use super::service::PortfolioSnapshot;
use super::types::Holding;
use crate::coingecko::{SearchHit, TokenQuote};

// Counts chars, not bytes; token names are arbitrary UTF-8.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Format holdings as a table
pub struct HoldingsFormatter<'a> {
    pub holdings: &'a [Holding],
}

impl<'a> HoldingsFormatter<'a> {
    pub fn new(holdings: &'a [Holding]) -> Self {
        Self { holdings }
    }

    pub fn format_table(&self) -> String {
        if self.holdings.is_empty() {
            return "No holdings. Use 'coinfolio search' and 'coinfolio add' to get started.\n"
                .to_string();
        }

        let mut output = String::new();

        output.push_str("┌──────────┬──────────────────────┬──────────────┬──────────────┬──────────┬──────────────┐\n");
        output.push_str("│ Token    │ Name                 │ Amount       │ Price        │ 24h %    │ Value        │\n");
        output.push_str("├──────────┼──────────────────────┼──────────────┼──────────────┼──────────┼──────────────┤\n");

        for holding in self.holdings {
            let change = holding.quote.price_change_percentage_24h;
            let sign = if change >= Decimal::ZERO { "+" } else { "" };

            output.push_str(&format!(
                "│ {:<8} │ {:<20} │ {:>12.4} │ ${:>11.4} │ {:>7} │ ${:>11.2} │\n",
                truncate(&holding.quote.symbol.to_uppercase(), 8),
                truncate(&holding.quote.name, 20),
                holding.amount,
                holding.quote.current_price,
                format!("{}{:.2}", sign, change),
                holding.value,
            ));
        }

        output.push_str("└──────────┴──────────────────────┴──────────────┴──────────────┴──────────┴──────────────┘\n");

        output
    }
}

/// Format portfolio totals for display
pub struct SummaryFormatter<'a> {
    pub snapshot: &'a PortfolioSnapshot,
}

impl<'a> SummaryFormatter<'a> {
    pub fn new(snapshot: &'a PortfolioSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn format(&self) -> String {
        let mut output = String::new();

        let change = self.snapshot.total_change_24h;
        let change_line = if change >= Decimal::ZERO {
            format!("+${:.2}", change).green().to_string()
        } else {
            format!("-${:.2}", change.abs()).red().to_string()
        };

        // 24h change relative to yesterday's implied total
        let base = self.snapshot.total_value - change;
        let pct = if base.is_zero() {
            Decimal::ZERO
        } else {
            change / base * Decimal::ONE_HUNDRED
        };

        output.push_str(&format!(
            "Portfolio value: {}\n",
            format!("${:.2}", self.snapshot.total_value).bold()
        ));
        output.push_str(&format!("24h change:      {} ({:.2}%)\n", change_line, pct));
        output.push_str(&format!(
            "Holdings:        {} token{}\n",
            self.snapshot.holdings.len(),
            if self.snapshot.holdings.len() == 1 { "" } else { "s" }
        ));

        if self.snapshot.is_loading {
            output.push_str(&format!("{}\n", "Updating prices...".dimmed()));
        }

        output
    }
}

/// Format search hits as a table
pub fn format_search_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No tokens found.\n".to_string();
    }

    let mut output = String::new();

    output.push_str("┌──────┬──────────────────────────┬──────────┬──────────────────────────┐\n");
    output.push_str("│ Rank │ Name                     │ Symbol   │ Id                       │\n");
    output.push_str("├──────┼──────────────────────────┼──────────┼──────────────────────────┤\n");

    for hit in hits {
        let rank = hit
            .market_cap_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "│ {:>4} │ {:<24} │ {:<8} │ {:<24} │\n",
            rank,
            truncate(&hit.name, 24),
            truncate(&hit.symbol.to_uppercase(), 8),
            truncate(&hit.id, 24),
        ));
    }

    output.push_str("└──────┴──────────────────────────┴──────────┴──────────────────────────┘\n");

    output
}

/// Format market quotes (trending / contract lookups) as a table
pub fn format_quotes(quotes: &[TokenQuote]) -> String {
    if quotes.is_empty() {
        return "No quotes available.\n".to_string();
    }

    let mut output = String::new();

    output.push_str("┌──────┬──────────────────────┬──────────┬──────────────┬──────────┐\n");
    output.push_str("│ Rank │ Name                 │ Symbol   │ Price        │ 24h %    │\n");
    output.push_str("├──────┼──────────────────────┼──────────┼──────────────┼──────────┤\n");

    for quote in quotes {
        let rank = quote
            .market_cap_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let change = quote.price_change_percentage_24h;
        let sign = if change >= Decimal::ZERO { "+" } else { "" };

        output.push_str(&format!(
            "│ {:>4} │ {:<20} │ {:<8} │ ${:>11.4} │ {:>7} │\n",
            rank,
            truncate(&quote.name, 20),
            truncate(&quote.symbol.to_uppercase(), 8),
            quote.current_price,
            format!("{}{:.2}", sign, change),
        ));
    }

    output.push_str("└──────┴──────────────────────┴──────────┴──────────────┴──────────┘\n");

    output
}
