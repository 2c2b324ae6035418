//! Thread-safe in-memory transaction history
//!
//! Records are grouped per account in a `DashMap` and kept in insertion order.
//! History ids come from a shared atomic sequence starting at 1.

use crate::core::traits::HistoryLog;
use crate::types::{AccountId, HistoryId, HistoryRecord, Points, Timestamp, TransactionKind};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory `HistoryLog`
#[derive(Debug)]
pub struct InMemoryHistoryLog {
    /// Records by account id, in append order
    entries: DashMap<AccountId, Vec<HistoryRecord>>,

    /// Next history id to hand out
    next_id: AtomicU64,
}

impl InMemoryHistoryLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Total number of records across all accounts
    pub fn len(&self) -> usize {
        self.entries.iter().map(|entry| entry.value().len()).sum()
    }

    /// Whether the log holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryHistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog for InMemoryHistoryLog {
    fn append(
        &self,
        account_id: AccountId,
        amount: Points,
        kind: TransactionKind,
        timestamp: Timestamp,
    ) -> HistoryRecord {
        let id: HistoryId = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = HistoryRecord {
            id,
            account_id,
            amount,
            kind,
            timestamp,
        };

        self.entries
            .entry(account_id)
            .or_default()
            .push(record.clone());

        record
    }

    fn list_by_account(&self, account_id: AccountId) -> Vec<HistoryRecord> {
        self.entries
            .get(&account_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn all(&self) -> Vec<HistoryRecord> {
        let mut records: Vec<HistoryRecord> = self
            .entries
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.id);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_account_has_empty_history() {
        let log = InMemoryHistoryLog::new();

        assert!(log.list_by_account(1).is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let log = InMemoryHistoryLog::new();

        let first = log.append(1, 100, TransactionKind::Charge, 10);
        let second = log.append(2, 50, TransactionKind::Charge, 11);
        let third = log.append(1, 30, TransactionKind::Use, 12);

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_list_by_account_preserves_insertion_order() {
        let log = InMemoryHistoryLog::new();

        log.append(1, 100, TransactionKind::Charge, 10);
        log.append(2, 999, TransactionKind::Charge, 10);
        log.append(1, 50, TransactionKind::Use, 11);
        log.append(1, 70, TransactionKind::Charge, 12);

        let history = log.list_by_account(1);
        let summary: Vec<(Points, TransactionKind)> =
            history.iter().map(|r| (r.amount, r.kind)).collect();

        assert_eq!(
            summary,
            vec![
                (100, TransactionKind::Charge),
                (50, TransactionKind::Use),
                (70, TransactionKind::Charge),
            ]
        );
        assert!(history.iter().all(|r| r.account_id == 1));
    }

    #[test]
    fn test_all_is_sorted_by_id() {
        let log = InMemoryHistoryLog::new();

        log.append(3, 1, TransactionKind::Charge, 1);
        log.append(1, 2, TransactionKind::Charge, 1);
        log.append(2, 3, TransactionKind::Charge, 1);

        let ids: Vec<HistoryId> = log.all().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_concurrent_appends_get_unique_ids() {
        use std::collections::HashSet;
        use std::sync::Arc;
        use std::thread;

        let log = Arc::new(InMemoryHistoryLog::new());
        let mut handles = vec![];

        for i in 0..10 {
            let log_clone = Arc::clone(&log);
            handles.push(thread::spawn(move || {
                for _ in 0..10 {
                    log_clone.append(i % 3 + 1, 1, TransactionKind::Charge, 1);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let ids: HashSet<HistoryId> = log.all().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 100);
        assert_eq!(log.len(), 100);
    }
}
