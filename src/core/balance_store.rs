//! Thread-safe in-memory balance storage
//!
//! `InMemoryBalanceStore` keeps one `BalanceRecord` per account in a `DashMap`.
//! The store performs no validation and no read-modify-write of its own; the
//! ledger serializes access per account before calling `get` and `put`.
//!
//! An optional artificial latency can be configured. Every `get` and `put`
//! then sleeps for that long, which widens the window between a read and the
//! following write and makes lost updates visible if callers don't serialize.

use crate::core::traits::BalanceStore;
use crate::types::{AccountId, BalanceRecord, Points, Timestamp};
use dashmap::DashMap;
use std::time::Duration;

/// In-memory `BalanceStore` backed by a `DashMap`
#[derive(Debug, Default)]
pub struct InMemoryBalanceStore {
    /// Balance records by account id
    records: DashMap<AccountId, BalanceRecord>,

    /// Artificial delay applied to every read and write
    latency: Option<Duration>,
}

impl InMemoryBalanceStore {
    /// Create an empty store with no artificial latency
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            latency: None,
        }
    }

    /// Create an empty store that sleeps for `latency` on every access
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            records: DashMap::new(),
            latency: Some(latency),
        }
    }

    fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
    }
}

impl BalanceStore for InMemoryBalanceStore {
    fn get(&self, account_id: AccountId) -> Option<BalanceRecord> {
        self.simulate_latency();
        self.records.get(&account_id).map(|entry| *entry.value())
    }

    fn put(&self, account_id: AccountId, balance: Points, timestamp: Timestamp) -> BalanceRecord {
        self.simulate_latency();
        let record = BalanceRecord {
            account_id,
            balance,
            updated_at: timestamp,
        };
        self.records.insert(account_id, record);
        record
    }

    fn all(&self) -> Vec<BalanceRecord> {
        self.records.iter().map(|entry| *entry.value()).collect()
    }
}
