//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Balance record for a single account
//! - `transaction`: Identifiers, history records and replayable operations
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod transaction;

pub use account::BalanceRecord;
pub use error::LedgerError;
pub use transaction::{
    AccountId, HistoryId, HistoryRecord, OperationRecord, Points, Timestamp, TransactionKind,
};
