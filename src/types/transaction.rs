//! Transaction-related types for the point ledger
//!
//! This module defines identifiers, the history record appended for every
//! successful mutation, and the operation record replayed by the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier
///
/// Signed so that non-positive ids can be represented and rejected with
/// `LedgerError::InvalidAccountId`.
pub type AccountId = i64;

/// Point amount or balance
pub type Points = i64;

/// Milliseconds since the Unix epoch
pub type Timestamp = u64;

/// History record identifier, assigned from a sequence in append order
pub type HistoryId = u64;

/// Kind of balance mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Increases the balance
    Charge,

    /// Decreases the balance
    Use,
}

impl TransactionKind {
    /// Lowercase name used in CSV input/output and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Charge => "charge",
            TransactionKind::Use => "use",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable entry in the transaction history
///
/// Created only as a side effect of a successful mutation; never mutated
/// or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Sequence-assigned identifier, strictly increasing in append order
    pub id: HistoryId,

    /// The account that was mutated
    pub account_id: AccountId,

    /// The (positive) amount moved by the mutation
    pub amount: Points,

    /// Whether the mutation was a charge or a use
    pub kind: TransactionKind,

    /// Operation time; equal to the balance record's `updated_at` after the mutation
    pub timestamp: Timestamp,
}

/// A single charge/use request as read from the replay CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationRecord {
    /// Charge or use
    pub kind: TransactionKind,

    /// Target account
    pub account_id: AccountId,

    /// Requested amount (validated by the ledger, not the reader)
    pub amount: Points,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TransactionKind::Charge, "charge")]
    #[case(TransactionKind::Use, "use")]
    fn test_kind_display(#[case] kind: TransactionKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
        assert_eq!(kind.as_str(), expected);
    }
}
