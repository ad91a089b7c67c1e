mod amount;

pub use amount::{ETHER_DECIMALS, format_ether, parse_ether};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("amount is empty")]
    EmptyAmount,
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("too many decimals for ether: {0}")]
    TooManyDecimals(String),
    #[error("amount overflows uint256: {0}")]
    AmountOverflow(String),
    #[error("invalid chain id: {0}")]
    InvalidChainId(String),
}

/// Account address as returned by the provider (case preserved).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Address(pub String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234...abcd`: first 6 characters, `...`, last 4. Applied to any
    /// length, so short input repeats characters on both sides.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let head: String = chars.iter().take(6).collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Parse an EIP-1193 hex quantity (`0x85`).
    pub fn from_hex(raw: &str) -> Result<Self, ParseError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        u64::from_str_radix(digits, 16)
            .map(ChainId)
            .map_err(|_| ParseError::InvalidChainId(raw.to_owned()))
    }

    /// Parse the decimal form kept in local storage (`133`).
    pub fn from_decimal(raw: &str) -> Result<Self, ParseError> {
        raw.trim()
            .parse::<u64>()
            .map(ChainId)
            .map_err(|_| ParseError::InvalidChainId(raw.to_owned()))
    }

    pub fn to_hex(self) -> String {
        format!("0x{:x}", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TokenSymbol {
    Hsk,
    Whsk,
}

impl TokenSymbol {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenSymbol::Hsk => "HSK",
            TokenSymbol::Whsk => "WHSK",
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Swap direction. `Wrap` puts HSK on top, `Unwrap` puts WHSK on top.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Wrap,
    #[default]
    Unwrap,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::Wrap => Direction::Unwrap,
            Direction::Unwrap => Direction::Wrap,
        }
    }

    /// Token spent (top field).
    pub fn input_token(self) -> TokenSymbol {
        match self {
            Direction::Wrap => TokenSymbol::Hsk,
            Direction::Unwrap => TokenSymbol::Whsk,
        }
    }

    /// Token received (bottom field).
    pub fn output_token(self) -> TokenSymbol {
        match self {
            Direction::Wrap => TokenSymbol::Whsk,
            Direction::Unwrap => TokenSymbol::Hsk,
        }
    }

    pub fn operation_title(self) -> &'static str {
        match self {
            Direction::Wrap => "Wrapping HSK",
            Direction::Unwrap => "Unwrapping WHSK",
        }
    }

    pub fn action_label(self) -> &'static str {
        match self {
            Direction::Wrap => "Wrap",
            Direction::Unwrap => "Unwrap",
        }
    }

    pub fn progress_label(self) -> &'static str {
        match self {
            Direction::Wrap => "Wrapping...",
            Direction::Unwrap => "Unwrapping...",
        }
    }

    /// `10 HSK → WHSK`
    pub fn describe(self, amount: &str) -> String {
        format!("{} {} → {}", amount, self.input_token(), self.output_token())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Pending,
    Success,
    Error,
}

impl OperationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OperationStatus::Pending)
    }

    /// Only `pending -> success | error` is allowed.
    pub fn can_transition_to(self, next: OperationStatus) -> bool {
        self == OperationStatus::Pending && next.is_terminal()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationStatus::Pending => "pending",
            OperationStatus::Success => "success",
            OperationStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationRecord {
    pub id: String,
    pub status: OperationStatus,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

impl OperationRecord {
    pub fn pending(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: OperationStatus::Pending,
            title: title.into(),
            description: description.into(),
            tx_hash: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_parses_hex_and_decimal() {
        assert_eq!(ChainId::from_hex("0x85"), Ok(ChainId(133)));
        assert_eq!(ChainId::from_hex("0X1"), Ok(ChainId(1)));
        assert_eq!(ChainId::from_decimal("133"), Ok(ChainId(133)));
        assert_eq!(ChainId(133).to_hex(), "0x85");
        assert!(ChainId::from_hex("0xzz").is_err());
        assert!(ChainId::from_decimal("").is_err());
    }

    #[test]
    fn address_short_form() {
        let addr = Address("0x1234567890123456789012345678901234567890".to_owned());
        assert_eq!(addr.short(), "0x1234...7890");
        assert_eq!(Address("0x1234".to_owned()).short(), "0x1234...1234");
        assert_eq!(Address("0xabcdef12".to_owned()).short(), "0xabcd...ef12");
        assert_eq!(Address(String::new()).short(), "...");
    }

    #[test]
    fn direction_labels_swap_with_toggle() {
        let d = Direction::default();
        assert_eq!(d, Direction::Unwrap);
        assert_eq!(d.input_token(), TokenSymbol::Whsk);
        assert_eq!(d.output_token(), TokenSymbol::Hsk);

        let w = d.toggled();
        assert_eq!(w.input_token(), TokenSymbol::Hsk);
        assert_eq!(w.output_token(), TokenSymbol::Whsk);
        assert_eq!(w.describe("10"), "10 HSK → WHSK");
        assert_eq!(w.toggled(), Direction::Unwrap);
    }

    #[test]
    fn status_transitions_only_leave_pending() {
        use OperationStatus::*;
        assert!(Pending.can_transition_to(Success));
        assert!(Pending.can_transition_to(Error));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Success.can_transition_to(Error));
        assert!(!Error.can_transition_to(Pending));
    }
}
