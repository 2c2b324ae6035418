//! Error types for the point ledger
//!
//! This module defines all error types that can occur while mutating or
//! querying balances, and while replaying operations from a CSV file.
//!
//! # Error Categories
//!
//! - **Policy rejections**: invalid account id, invalid amount, amount too
//!   large, ceiling exceeded, insufficient balance. These are deterministic and
//!   are detected before any mutation happens; they are never retried.
//! - **I/O and parsing errors**: raised by the CSV replay pipeline only.
//! - **Configuration errors**: invalid ledger policy values.

use super::transaction::{AccountId, Points};
use thiserror::Error;

/// Main error type for the point ledger
///
/// Each policy violation is its own variant so callers can match on the
/// exact kind instead of inspecting a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Account id is zero or negative
    #[error("Invalid account id {account}: account ids must be positive")]
    InvalidAccountId {
        /// The rejected account id
        account: AccountId,
    },

    /// Requested amount is zero or negative
    #[error("Invalid amount {amount} for account {account}: amounts must be positive")]
    InvalidAmount {
        /// Account id
        account: AccountId,
        /// The rejected amount
        amount: Points,
    },

    /// A single operation may never move more than the ceiling
    #[error("Amount {amount} for account {account} exceeds the per-operation limit {max}")]
    AmountTooLarge {
        /// Account id
        account: AccountId,
        /// The rejected amount
        amount: Points,
        /// The configured ceiling
        max: Points,
    },

    /// Charging would push the balance above the ceiling
    #[error(
        "Balance ceiling exceeded for account {account}: current {current}, charge {amount}, max {max}"
    )]
    BalanceCeilingExceeded {
        /// Account id
        account: AccountId,
        /// Balance before the charge
        current: Points,
        /// Requested charge
        amount: Points,
        /// The configured ceiling
        max: Points,
    },

    /// Using would push the balance below zero
    #[error("Insufficient balance for account {account}: current {current}, requested {amount}")]
    InsufficientBalance {
        /// Account id
        account: AccountId,
        /// Balance before the use
        current: Points,
        /// Requested use
        amount: Points,
    },

    /// Invalid ledger configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem
        message: String,
    },

    /// Unknown operation type in replay input
    #[error("Invalid operation type '{kind}'")]
    InvalidOperation {
        /// The unrecognised type string
        kind: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error in the replay pipeline - the malformed row
    /// is skipped and processing continues with the next one.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for LedgerError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Create an InvalidAccountId error
    pub fn invalid_account_id(account: AccountId) -> Self {
        LedgerError::InvalidAccountId { account }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(account: AccountId, amount: Points) -> Self {
        LedgerError::InvalidAmount { account, amount }
    }

    /// Create an AmountTooLarge error
    pub fn amount_too_large(account: AccountId, amount: Points, max: Points) -> Self {
        LedgerError::AmountTooLarge {
            account,
            amount,
            max,
        }
    }

    /// Create a BalanceCeilingExceeded error
    pub fn balance_ceiling_exceeded(
        account: AccountId,
        current: Points,
        amount: Points,
        max: Points,
    ) -> Self {
        LedgerError::BalanceCeilingExceeded {
            account,
            current,
            amount,
            max,
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(account: AccountId, current: Points, amount: Points) -> Self {
        LedgerError::InsufficientBalance {
            account,
            current,
            amount,
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        LedgerError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an InvalidOperation error
    pub fn invalid_operation(kind: &str) -> Self {
        LedgerError::InvalidOperation {
            kind: kind.to_string(),
        }
    }

    /// Whether this error is a deterministic policy rejection
    ///
    /// Rejections leave the ledger untouched and must not be retried.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidAccountId { .. }
                | LedgerError::InvalidAmount { .. }
                | LedgerError::AmountTooLarge { .. }
                | LedgerError::BalanceCeilingExceeded { .. }
                | LedgerError::InsufficientBalance { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_account_id(
        LedgerError::InvalidAccountId { account: 0 },
        "Invalid account id 0: account ids must be positive"
    )]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { account: 1, amount: -5 },
        "Invalid amount -5 for account 1: amounts must be positive"
    )]
    #[case::amount_too_large(
        LedgerError::AmountTooLarge { account: 1, amount: 2_000_000, max: 1_000_000 },
        "Amount 2000000 for account 1 exceeds the per-operation limit 1000000"
    )]
    #[case::ceiling_exceeded(
        LedgerError::BalanceCeilingExceeded { account: 1, current: 999_000, amount: 1_001, max: 1_000_000 },
        "Balance ceiling exceeded for account 1: current 999000, charge 1001, max 1000000"
    )]
    #[case::insufficient_balance(
        LedgerError::InsufficientBalance { account: 1, current: 1000, amount: 1500 },
        "Insufficient balance for account 1: current 1000, requested 1500"
    )]
    #[case::invalid_operation(
        LedgerError::InvalidOperation { kind: "refund".to_string() },
        "Invalid operation type 'refund'"
    )]
    #[case::parse_error_with_line(
        LedgerError::Parse { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        LedgerError::Parse { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid_account_id(LedgerError::invalid_account_id(-1), true)]
    #[case::invalid_amount(LedgerError::invalid_amount(1, 0), true)]
    #[case::amount_too_large(LedgerError::amount_too_large(1, 10, 5), true)]
    #[case::ceiling_exceeded(LedgerError::balance_ceiling_exceeded(1, 5, 1, 5), true)]
    #[case::insufficient_balance(LedgerError::insufficient_balance(1, 0, 1), true)]
    #[case::invalid_config(LedgerError::invalid_config("max_balance must be positive"), false)]
    #[case::io(LedgerError::Io { message: "disk".to_string() }, false)]
    fn test_is_rejection(#[case] error: LedgerError, #[case] expected: bool) {
        assert_eq!(error.is_rejection(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
