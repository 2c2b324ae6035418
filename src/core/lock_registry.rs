//! Per-account lock registry
//!
//! This module provides the `AccountLockRegistry`, which hands out exclusive
//! ownership of a single account for the duration of a logical transaction.
//!
//! # Design
//!
//! Locks live in a `DashMap<AccountId, Arc<Mutex<()>>>` and are created lazily
//! the first time an account is touched. Creation goes through the map's
//! `entry().or_insert_with()`, which runs under the shard's write lock, so two
//! callers racing on a brand-new account always observe the same lock object.
//! The map is sharded internally; there is no global lock in front of it.
//!
//! The per-account lock is a `tokio::sync::Mutex`. Waiters are granted the lock
//! in FIFO order, so no caller starves under sustained contention on a single
//! account. Waiting suspends the task instead of blocking the worker thread.
//!
//! # Lifecycle
//!
//! Locks are never evicted implicitly. `prune_idle` reclaims the locks of
//! accounts that nobody currently holds or waits on, for deployments where the
//! number of distinct accounts is unbounded.

use crate::types::AccountId;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Proof of exclusive ownership of one account
///
/// Obtained from `AccountLockRegistry::acquire`. Ownership is returned either
/// explicitly through `release` or implicitly when the guard is dropped, so an
/// early return on a validation error can never leave the account locked.
#[must_use = "the account lock is released as soon as the guard is dropped"]
pub struct AccountLockGuard {
    account_id: AccountId,
    _guard: OwnedMutexGuard<()>,
}

impl AccountLockGuard {
    /// The account this guard locks
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Return ownership of the account
    pub fn release(self) {
        drop(self);
    }
}

impl fmt::Debug for AccountLockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountLockGuard")
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Lazily-populated map of per-account mutexes
///
/// Holding the lock of one account never blocks operations on another.
#[derive(Debug, Default)]
pub struct AccountLockRegistry {
    /// One mutex per account id that has been touched
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl AccountLockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the lock for an account, creating it on first use
    ///
    /// The returned `Arc` is cloned out of the map before the caller waits on
    /// it, so no map shard is held while suspended.
    fn lock_for(&self, account_id: AccountId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.get(&account_id) {
            return Arc::clone(lock.value());
        }

        let lock = self.locks.entry(account_id).or_insert_with(|| {
            debug!(account_id, "creating account lock");
            Arc::new(Mutex::new(()))
        });
        Arc::clone(lock.value())
    }

    /// Wait until the account's lock is free and take it
    ///
    /// # Arguments
    ///
    /// * `account_id` - The account to lock
    ///
    /// # Returns
    ///
    /// A guard proving exclusive ownership until it is released or dropped.
    pub async fn acquire(&self, account_id: AccountId) -> AccountLockGuard {
        let lock = self.lock_for(account_id);
        let guard = lock.lock_owned().await;

        AccountLockGuard {
            account_id,
            _guard: guard,
        }
    }

    /// Take the account's lock only if it is free right now
    ///
    /// # Returns
    ///
    /// * `Some(guard)` if the lock was free
    /// * `None` if another caller holds it
    pub fn try_acquire(&self, account_id: AccountId) -> Option<AccountLockGuard> {
        let lock = self.lock_for(account_id);
        lock.try_lock_owned()
            .ok()
            .map(|guard| AccountLockGuard {
                account_id,
                _guard: guard,
            })
    }

    /// Drop the locks of accounts that nobody holds or waits on
    ///
    /// A lock is idle when the registry owns the only reference to it. Holders
    /// and waiters always own a clone of the `Arc`, and new clones are only
    /// made under the shard lock that `retain` holds while checking, so a lock
    /// is never removed from under an acquirer.
    ///
    /// # Returns
    ///
    /// The number of locks removed.
    pub fn prune_idle(&self) -> usize {
        let mut removed = 0;
        self.locks.retain(|_, lock| {
            let in_use = Arc::strong_count(lock) > 1;
            if !in_use {
                removed += 1;
            }
            in_use
        });

        if removed > 0 {
            debug!(removed, "pruned idle account locks");
        }
        removed
    }

    /// Number of accounts that currently have a lock
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no account has a lock yet
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
