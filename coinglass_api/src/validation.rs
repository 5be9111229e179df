//! Parameter checks run before any request is sent.

use crate::Error;

pub const MAX_IDENTIFIER_LENGTH: usize = 32;
pub const MAX_LIMIT: u32 = 4500;

/// Validate a coin symbol (e.g. `BTC`) or exchange pair (e.g. `BTCUSDT`).
pub fn validate_symbol(input: &str) -> Result<(), Error> {
    validate_identifier("symbol", input)
}

/// Validate an exchange name (e.g. `Binance`, `OKX`).
pub fn validate_exchange(input: &str) -> Result<(), Error> {
    validate_identifier("exchange", input)
}

/// Non-empty, bounded length, ASCII alphanumerics plus `-`, `_`, `/` and `.`.
fn validate_identifier(name: &str, input: &str) -> Result<(), Error> {
    if input.trim().is_empty() {
        return Err(Error::InvalidParameter(format!("{} is empty", name)));
    }
    if input.len() > MAX_IDENTIFIER_LENGTH {
        return Err(Error::InvalidParameter(format!(
            "{} exceeds maximum length of {} bytes",
            name, MAX_IDENTIFIER_LENGTH
        )));
    }
    if let Some(c) = input
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.')))
    {
        return Err(Error::InvalidParameter(format!(
            "{} '{}' contains invalid character {:?}",
            name, input, c
        )));
    }
    Ok(())
}

/// Validate a result limit (must be 1..=4500).
pub fn validate_limit(limit: u32) -> Result<(), Error> {
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(Error::InvalidParameter(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    Ok(())
}

/// Validate optional start/end timestamps: non-negative, and start before end
/// when both are given.
pub fn validate_time_range(start_time: Option<i64>, end_time: Option<i64>) -> Result<(), Error> {
    for (name, value) in [("startTime", start_time), ("endTime", end_time)] {
        if value.is_some_and(|v| v < 0) {
            return Err(Error::InvalidParameter(format!("{} must not be negative", name)));
        }
    }
    if let (Some(start), Some(end)) = (start_time, end_time) {
        if start >= end {
            return Err(Error::InvalidParameter(
                "startTime must be before endTime".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_valid() {
        assert!(validate_symbol("BTC").is_ok());
        assert!(validate_symbol("BTCUSDT").is_ok());
        assert!(validate_symbol("BTC-USDT-SWAP").is_ok());
        assert!(validate_symbol("1000PEPE_USDT").is_ok());
    }

    #[test]
    fn symbol_empty() {
        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("   ").is_err());
    }

    #[test]
    fn symbol_too_long() {
        assert!(validate_symbol(&"A".repeat(MAX_IDENTIFIER_LENGTH)).is_ok());
        assert!(validate_symbol(&"A".repeat(MAX_IDENTIFIER_LENGTH + 1)).is_err());
    }

    #[test]
    fn symbol_bad_characters() {
        assert!(validate_symbol("BTC&limit=1").is_err());
        assert!(validate_symbol("BTC USDT").is_err());
        assert!(validate_symbol("BT\u{00C7}").is_err());
    }

    #[test]
    fn exchange_valid() {
        assert!(validate_exchange("Binance").is_ok());
        assert!(validate_exchange("Crypto.com").is_ok());
    }

    #[test]
    fn exchange_invalid_message_names_field() {
        let err = validate_exchange("").unwrap_err();
        assert!(err.to_string().contains("exchange"));
    }

    #[test]
    fn limit_bounds() {
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(MAX_LIMIT).is_ok());
        assert!(validate_limit(MAX_LIMIT + 1).is_err());
    }

    #[test]
    fn time_range() {
        assert!(validate_time_range(None, None).is_ok());
        assert!(validate_time_range(Some(1), None).is_ok());
        assert!(validate_time_range(None, Some(1)).is_ok());
        assert!(validate_time_range(Some(1), Some(2)).is_ok());
        assert!(validate_time_range(Some(2), Some(2)).is_err());
        assert!(validate_time_range(Some(3), Some(2)).is_err());
        assert!(validate_time_range(Some(-1), None).is_err());
        assert!(validate_time_range(None, Some(-5)).is_err());
    }
}
