//! Shared argument parsers

use rust_decimal::Decimal;

/// Parse a token amount from the command line
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    s.parse::<Decimal>()
        .map_err(|e| format!("invalid amount '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_decimal_amounts() {
        assert_eq!(parse_amount("1.5").unwrap(), dec!(1.5));
        assert_eq!(parse_amount("0").unwrap(), dec!(0));
        assert!(parse_amount("abc").is_err());
    }
}
