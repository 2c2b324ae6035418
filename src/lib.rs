//! Point Ledger Library
//! # Overview
//!
//! This library maintains a per-account point balance that concurrent callers
//! can increase ("charge") or decrease ("use"). Every mutation on an account
//! runs under that account's lock, and every successful mutation is recorded in
//! an append-only history.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (BalanceRecord, HistoryRecord, LedgerError)
//! - [`core`] - Business logic components:
//!   - [`core::lock_registry`] - Per-account lock registry
//!   - [`core::validator`] - Balance policy checks
//!   - [`core::ledger`] - Mutation orchestration and read-only queries
//!   - [`core::balance_store`] / [`core::history_log`] - In-memory storage collaborators
//! - [`cli`] - CLI arguments parsing
//! - [`io`] - CSV reading of operations and CSV output of balances/history
//! - [`replay`] - Concurrent replay of an operations file against a ledger
//!
//! # Invariants
//!
//! - Balances stay within `[0, max_balance]` between mutations
//! - A failed mutation changes neither the balance nor the history
//! - Each successful mutation appends exactly one history record
//! - Concurrent mutations on one account are equivalent to running them
//!   serially in lock-grant order

pub mod cli;
pub mod core;
pub mod io;
pub mod replay;
pub mod types;

pub use crate::core::{
    AccountLockRegistry, BalanceStore, HistoryLog, InMemoryBalanceStore, InMemoryHistoryLog,
    LedgerConfig, LedgerService, DEFAULT_MAX_BALANCE,
};
pub use io::{write_balances_csv, write_history_csv};
pub use types::{
    AccountId, BalanceRecord, HistoryId, HistoryRecord, LedgerError, OperationRecord, Points,
    Timestamp, TransactionKind,
};
