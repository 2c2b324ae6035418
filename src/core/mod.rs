//! Core ledger components
//!
//! - **AccountLockRegistry**: one lazily-created lock per account
//! - **validator**: pure policy checks on amounts and resulting balances
//! - **LedgerService**: read-validate-write-append under the account lock
//! - **BalanceStore / HistoryLog**: storage contracts, with in-memory implementations
//!
//! # Thread Safety
//!
//! All components are designed for safe concurrent access:
//! - Mutations on different accounts proceed in parallel
//! - Mutations on the same account are serialized in lock-grant order
//! - No global lock - contention is scoped to the account id

pub mod balance_store;
pub mod history_log;
pub mod ledger;
pub mod lock_registry;
pub mod traits;
pub mod validator;

pub use balance_store::InMemoryBalanceStore;
pub use history_log::InMemoryHistoryLog;
pub use ledger::{LedgerConfig, LedgerService, DEFAULT_MAX_BALANCE};
pub use lock_registry::{AccountLockGuard, AccountLockRegistry};
pub use traits::{BalanceStore, HistoryLog};
