//! Balance mutation orchestration
//!
//! This module provides the `LedgerService`, which turns a charge or use
//! request into one logical transaction:
//!
//! ```text
//! validate request → acquire account lock → read balance → validate result
//!                  → write balance → append history → release lock
//! ```
//!
//! # Locking
//!
//! The account lock spans the whole read-validate-write-append sequence, not
//! just the write. The ceiling and non-negativity checks depend on the balance
//! read earlier in the same transaction; two charges that both read a stale
//! balance would otherwise both pass and together exceed the ceiling.
//!
//! Locks are per account. Mutations on different accounts run in parallel.
//! Read-only queries go straight to the stores without locking and observe the
//! last completed write.
//!
//! # Thread Safety
//!
//! `LedgerService` is cheap to clone (all state is behind `Arc`) and every
//! method takes `&self`, so clones can be moved into as many tasks as needed.

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use super::balance_store::InMemoryBalanceStore;
use super::history_log::InMemoryHistoryLog;
use super::lock_registry::AccountLockRegistry;
use super::traits::{BalanceStore, HistoryLog};
use super::validator;
use crate::types::{
    AccountId, BalanceRecord, HistoryRecord, LedgerError, Points, Timestamp, TransactionKind,
};

/// Default balance ceiling
pub const DEFAULT_MAX_BALANCE: Points = 1_000_000;

/// Ledger policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Maximum balance an account may hold; also the largest single operation
    pub max_balance: Points,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_balance: DEFAULT_MAX_BALANCE,
        }
    }
}

impl LedgerConfig {
    /// Create a config with a custom ceiling
    ///
    /// # Errors
    ///
    /// `LedgerError::InvalidConfig` if `max_balance` is not positive.
    pub fn new(max_balance: Points) -> Result<Self, LedgerError> {
        if max_balance <= 0 {
            return Err(LedgerError::invalid_config(format!(
                "max_balance must be positive, got {}",
                max_balance
            )));
        }
        Ok(Self { max_balance })
    }
}

/// Concurrent point ledger
///
/// Serializes mutations per account through an `AccountLockRegistry` and
/// records every successful mutation in the `HistoryLog`.
#[derive(Clone)]
pub struct LedgerService {
    /// Policy applied to every mutation
    config: LedgerConfig,

    /// One lock per account, created on first mutation
    locks: Arc<AccountLockRegistry>,

    /// Current balances
    balances: Arc<dyn BalanceStore>,

    /// Append-only record of successful mutations
    history: Arc<dyn HistoryLog>,
}

impl fmt::Debug for LedgerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerService")
            .field("config", &self.config)
            .field("locks", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl LedgerService {
    /// Create a ledger over the given stores
    ///
    /// # Arguments
    ///
    /// * `config` - Ledger policy
    /// * `balances` - Balance storage shared with any other readers
    /// * `history` - History log shared with any other readers
    pub fn new(
        config: LedgerConfig,
        balances: Arc<dyn BalanceStore>,
        history: Arc<dyn HistoryLog>,
    ) -> Self {
        Self {
            config,
            locks: Arc::new(AccountLockRegistry::new()),
            balances,
            history,
        }
    }

    /// Create a ledger backed by fresh in-memory stores
    pub fn in_memory(config: LedgerConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryBalanceStore::new()),
            Arc::new(InMemoryHistoryLog::new()),
        )
    }

    /// The policy this ledger enforces
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The lock registry, for lifecycle management such as `prune_idle`
    pub fn locks(&self) -> &AccountLockRegistry {
        &self.locks
    }

    /// Increase an account's balance
    ///
    /// # Returns
    ///
    /// * `Ok(BalanceRecord)` - The balance after the charge
    /// * `Err(LedgerError::InvalidAccountId)` - If `account_id` is not positive
    /// * `Err(LedgerError::InvalidAmount)` - If `amount` is not positive
    /// * `Err(LedgerError::AmountTooLarge)` - If `amount` exceeds the ceiling
    /// * `Err(LedgerError::BalanceCeilingExceeded)` - If the new balance would exceed the ceiling
    ///
    /// On error neither the balance nor the history is touched.
    pub async fn charge(
        &self,
        account_id: AccountId,
        amount: Points,
    ) -> Result<BalanceRecord, LedgerError> {
        self.apply(account_id, amount, TransactionKind::Charge)
            .await
    }

    /// Decrease an account's balance
    ///
    /// # Returns
    ///
    /// * `Ok(BalanceRecord)` - The balance after the use
    /// * `Err(LedgerError::InvalidAccountId)` - If `account_id` is not positive
    /// * `Err(LedgerError::InvalidAmount)` - If `amount` is not positive
    /// * `Err(LedgerError::AmountTooLarge)` - If `amount` exceeds the ceiling
    /// * `Err(LedgerError::InsufficientBalance)` - If the new balance would be negative
    ///
    /// On error neither the balance nor the history is touched.
    pub async fn use_points(
        &self,
        account_id: AccountId,
        amount: Points,
    ) -> Result<BalanceRecord, LedgerError> {
        self.apply(account_id, amount, TransactionKind::Use).await
    }

    /// Apply a charge or use according to `kind`
    pub async fn apply(
        &self,
        account_id: AccountId,
        amount: Points,
        kind: TransactionKind,
    ) -> Result<BalanceRecord, LedgerError> {
        validator::validate_account_id(account_id)?;
        validator::validate_amount_positive(account_id, amount)?;
        validator::validate_amount_within_ceiling(account_id, amount, self.config.max_balance)?;

        let guard = self.locks.acquire(account_id).await;

        let current = self
            .balances
            .get(account_id)
            .unwrap_or_else(|| BalanceRecord::empty(account_id));

        let new_balance = match kind {
            TransactionKind::Charge => validator::validate_charge_result(
                account_id,
                current.balance,
                amount,
                self.config.max_balance,
            )?,
            TransactionKind::Use => {
                validator::validate_use_result(account_id, current.balance, amount)?
            }
        };

        // Never move updated_at backwards, even if the wall clock does
        let timestamp = now_millis().max(current.updated_at);

        let record = self.balances.put(account_id, new_balance, timestamp);
        let entry = self.history.append(account_id, amount, kind, timestamp);

        guard.release();

        debug!(
            account_id,
            amount,
            kind = %kind,
            balance = record.balance,
            history_id = entry.id,
            "applied mutation"
        );

        Ok(record)
    }

    /// Current balance of an account, without locking
    ///
    /// Unknown accounts read as a zero balance.
    ///
    /// # Errors
    ///
    /// `LedgerError::InvalidAccountId` if `account_id` is not positive.
    pub fn get_balance(&self, account_id: AccountId) -> Result<BalanceRecord, LedgerError> {
        validator::validate_account_id(account_id)?;

        Ok(self
            .balances
            .get(account_id)
            .unwrap_or_else(|| BalanceRecord::empty(account_id)))
    }

    /// History of an account in insertion order, without locking
    ///
    /// Unknown accounts have an empty history.
    ///
    /// # Errors
    ///
    /// `LedgerError::InvalidAccountId` if `account_id` is not positive.
    pub fn get_history(&self, account_id: AccountId) -> Result<Vec<HistoryRecord>, LedgerError> {
        validator::validate_account_id(account_id)?;

        Ok(self.history.list_by_account(account_id))
    }

    /// Snapshot of every stored balance, sorted by account id
    pub fn balances(&self) -> Vec<BalanceRecord> {
        let mut records = self.balances.all();
        records.sort_by_key(|record| record.account_id);
        records
    }

    /// Snapshot of the full history, sorted by history id
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.history.all()
    }
}

/// Wall-clock time in milliseconds since the Unix epoch
///
/// A clock set before 1970 reads as 0; the per-account clamp in `apply` keeps
/// timestamps monotonic regardless.
fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as Timestamp)
        .unwrap_or(0)
}
