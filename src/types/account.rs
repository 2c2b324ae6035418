//! Account-related types for the point ledger
//!
//! This module defines the balance record kept per account.

use super::transaction::{AccountId, Points, Timestamp};
use serde::{Deserialize, Serialize};

/// Point balance of a single account
///
/// Only `LedgerService` mutates balance records, and only while holding the
/// account's lock. Between mutations `balance` is always within
/// `[0, max_balance]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// The account this balance belongs to
    pub account_id: AccountId,

    /// Current point balance
    pub balance: Points,

    /// Time of the last successful mutation (milliseconds since the Unix epoch)
    ///
    /// Zero for an account that has never been mutated.
    pub updated_at: Timestamp,
}

impl BalanceRecord {
    /// Create a zero-balance record for an account that has no stored state
    ///
    /// # Arguments
    ///
    /// * `account_id` - The account to create the record for
    ///
    /// # Returns
    ///
    /// A new BalanceRecord with:
    /// - balance = 0
    /// - updated_at = 0
    pub fn empty(account_id: AccountId) -> Self {
        BalanceRecord {
            account_id,
            balance: 0,
            updated_at: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_has_zero_balance() {
        let record = BalanceRecord::empty(7);

        assert_eq!(record.account_id, 7);
        assert_eq!(record.balance, 0);
        assert_eq!(record.updated_at, 0);
    }
}
