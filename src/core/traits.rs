//! Storage contracts consumed by the ledger
//!
//! The ledger treats balance storage and the transaction history as external
//! collaborators. Durability is their concern; the ledger only relies on the
//! point read/write and append/list operations below. Both traits take `&self`
//! so a single store can be shared behind an `Arc` across tasks.

use crate::types::{AccountId, BalanceRecord, HistoryRecord, Points, Timestamp, TransactionKind};

/// Keyed storage of account balances
pub trait BalanceStore: Send + Sync {
    /// Read the stored balance record, or `None` if the account was never written
    fn get(&self, account_id: AccountId) -> Option<BalanceRecord>;

    /// Overwrite the balance record and return what was stored
    fn put(&self, account_id: AccountId, balance: Points, timestamp: Timestamp) -> BalanceRecord;

    /// Snapshot of every stored record, in no particular order
    fn all(&self) -> Vec<BalanceRecord>;
}

/// Append-only log of successful mutations
pub trait HistoryLog: Send + Sync {
    /// Append a record, assigning it the next history id
    fn append(
        &self,
        account_id: AccountId,
        amount: Points,
        kind: TransactionKind,
        timestamp: Timestamp,
    ) -> HistoryRecord;

    /// All records for one account, in insertion order
    fn list_by_account(&self, account_id: AccountId) -> Vec<HistoryRecord>;

    /// Every record in the log, ordered by history id
    fn all(&self) -> Vec<HistoryRecord>;
}
