//! Ether amount conversion between user-entered decimal strings and wei.

use alloy_primitives::U256;

use crate::ParseError;

pub const ETHER_DECIMALS: usize = 18;

const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// Parse a decimal ether amount (`"1.5"`, `"10"`, `".25"`) into wei.
pub fn parse_ether(raw: &str) -> Result<U256, ParseError> {
    let amount = raw.trim();
    if amount.is_empty() {
        return Err(ParseError::EmptyAmount);
    }

    let (integer, fraction) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };
    if integer.is_empty() && fraction.is_empty() {
        return Err(ParseError::InvalidAmount(raw.to_owned()));
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || !all_digits(fraction) {
        return Err(ParseError::InvalidAmount(raw.to_owned()));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > ETHER_DECIMALS {
        return Err(ParseError::TooManyDecimals(raw.to_owned()));
    }

    let whole = if integer.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(integer, 10).map_err(|_| ParseError::AmountOverflow(raw.to_owned()))?
    };

    let frac_wei = if fraction.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{fraction:0<width$}", width = ETHER_DECIMALS);
        U256::from_str_radix(&padded, 10).map_err(|_| ParseError::InvalidAmount(raw.to_owned()))?
    };

    whole
        .checked_mul(U256::from(WEI_PER_ETHER))
        .and_then(|w| w.checked_add(frac_wei))
        .ok_or_else(|| ParseError::AmountOverflow(raw.to_owned()))
}

/// Format wei as ether: trailing zeros trimmed, at least one fractional digit.
pub fn format_ether(wei: U256) -> String {
    let unit = U256::from(WEI_PER_ETHER);
    let whole = wei / unit;
    let remainder = (wei % unit).to_string();
    let padded = format!("{remainder:0>width$}", width = ETHER_DECIMALS);
    let trimmed = padded.trim_end_matches('0');
    let fraction = if trimmed.is_empty() { "0" } else { trimmed };
    format!("{whole}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(WEI_PER_ETHER)
    }

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_ether("10").unwrap(), ether(10));
        assert_eq!(parse_ether(" 1.5 ").unwrap(), U256::from(1_500_000_000_000_000_000u64));
        assert_eq!(parse_ether(".25").unwrap(), U256::from(250_000_000_000_000_000u64));
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), U256::from(1u64));
        assert_eq!(parse_ether("2.").unwrap(), ether(2));
    }

    #[test]
    fn trailing_zeros_do_not_count_as_decimals() {
        assert_eq!(parse_ether("1.0000000000000000000000").unwrap(), ether(1));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(parse_ether(""), Err(ParseError::EmptyAmount));
        assert!(matches!(parse_ether("."), Err(ParseError::InvalidAmount(_))));
        assert!(matches!(parse_ether("-1"), Err(ParseError::InvalidAmount(_))));
        assert!(matches!(parse_ether("1e18"), Err(ParseError::InvalidAmount(_))));
        assert!(matches!(parse_ether("1.2.3"), Err(ParseError::InvalidAmount(_))));
        assert!(matches!(
            parse_ether("0.0000000000000000001"),
            Err(ParseError::TooManyDecimals(_))
        ));
        let huge = "9".repeat(90);
        assert!(matches!(parse_ether(&huge), Err(ParseError::AmountOverflow(_))));
    }

    #[test]
    fn formats_like_ethers() {
        assert_eq!(format_ether(U256::ZERO), "0.0");
        assert_eq!(format_ether(ether(12)), "12.0");
        assert_eq!(format_ether(U256::from(1_500_000_000_000_000_000u64)), "1.5");
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
    }

    #[test]
    fn formatted_balance_parses_back() {
        let wei = U256::from(123_456_789_000_000_000_000u128);
        assert_eq!(parse_ether(&format_ether(wei)).unwrap(), wei);
    }
}
