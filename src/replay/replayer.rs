//! Bounded concurrent submission of operations to a ledger

use crate::core::LedgerService;
use crate::types::{LedgerError, OperationRecord};
use futures::stream::{self, StreamExt};
use tracing::{error, warn};

/// Outcome counts of a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Operations the ledger applied
    pub applied: usize,
    /// Operations the ledger rejected by policy
    pub rejected: usize,
    /// Rows that could not be parsed into an operation
    pub skipped: usize,
}

impl ReplaySummary {
    /// Add another summary's counts to this one
    pub fn merge(&mut self, other: ReplaySummary) {
        self.applied += other.applied;
        self.rejected += other.rejected;
        self.skipped += other.skipped;
    }
}

/// Submits operations to a shared ledger from concurrent tasks
#[derive(Debug, Clone)]
pub struct Replayer {
    /// The ledger operations are applied to
    ledger: LedgerService,

    /// Maximum number of spawned operations in flight
    max_concurrent: usize,
}

impl Replayer {
    /// Create a replayer over a ledger
    pub fn new(ledger: LedgerService, max_concurrent: usize) -> Self {
        Self {
            ledger,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Apply a batch of operations concurrently
    ///
    /// Every operation runs on its own tokio task, at most `max_concurrent` at
    /// a time. Returns once all of them have finished. Rejections are logged
    /// and counted; they never stop the batch.
    pub async fn replay_batch(&self, batch: Vec<OperationRecord>) -> ReplaySummary {
        let outcomes: Vec<_> = stream::iter(batch)
            .map(|operation| {
                let ledger = self.ledger.clone();
                tokio::spawn(async move {
                    let result = ledger
                        .apply(operation.account_id, operation.amount, operation.kind)
                        .await;
                    (operation, result)
                })
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut summary = ReplaySummary::default();
        for outcome in outcomes {
            match outcome {
                Ok((_, Ok(_))) => summary.applied += 1,
                Ok((operation, Err(e))) => {
                    log_rejection(&operation, &e);
                    summary.rejected += 1;
                }
                Err(e) => {
                    error!(error = %e, "replay task panicked");
                }
            }
        }

        summary
    }
}

fn log_rejection(operation: &OperationRecord, error: &LedgerError) {
    warn!(
        account_id = operation.account_id,
        amount = operation.amount,
        kind = %operation.kind,
        error = %error,
        "operation rejected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LedgerConfig;
    use crate::types::TransactionKind;

    fn op(kind: TransactionKind, account_id: i64, amount: i64) -> OperationRecord {
        OperationRecord {
            kind,
            account_id,
            amount,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_replay_batch_applies_all_operations() {
        let ledger = LedgerService::in_memory(LedgerConfig::default());
        let replayer = Replayer::new(ledger.clone(), 4);

        let batch = (1..=10)
            .map(|account| op(TransactionKind::Charge, account, 1000))
            .collect();

        let summary = replayer.replay_batch(batch).await;

        assert_eq!(summary.applied, 10);
        assert_eq!(summary.rejected, 0);
        for account in 1..=10 {
            assert_eq!(ledger.get_balance(account).unwrap().balance, 1000);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_replay_batch_counts_rejections() {
        let ledger = LedgerService::in_memory(LedgerConfig::default());
        let replayer = Replayer::new(ledger.clone(), 4);

        let batch = vec![
            op(TransactionKind::Use, 1, 10),
            op(TransactionKind::Charge, 2, 0),
            op(TransactionKind::Charge, 3, 5),
        ];

        let summary = replayer.replay_batch(batch).await;

        assert_eq!(
            summary,
            ReplaySummary {
                applied: 1,
                rejected: 2,
                skipped: 0,
            }
        );
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let ledger = LedgerService::in_memory(LedgerConfig::default());
        let replayer = Replayer::new(ledger, 0);

        assert_eq!(replayer.max_concurrent, 1);
    }

    #[test]
    fn test_summary_merge() {
        let mut summary = ReplaySummary {
            applied: 1,
            rejected: 2,
            skipped: 3,
        };

        summary.merge(ReplaySummary {
            applied: 10,
            rejected: 20,
            skipped: 30,
        });

        assert_eq!(
            summary,
            ReplaySummary {
                applied: 11,
                rejected: 22,
                skipped: 33,
            }
        );
    }
}
