//! Benchmark suite for lock contention
//!
//! Compares many concurrent charges against a single account (fully
//! serialized) with the same number of charges spread across distinct
//! accounts (fully parallel).
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use point_ledger::{LedgerConfig, LedgerService};

fn main() {
    divan::main();
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .build()
        .expect("Failed to build runtime")
}

fn charge_all(accounts: impl Iterator<Item = i64>) {
    runtime().block_on(async {
        let ledger = LedgerService::in_memory(LedgerConfig::default());
        let handles: Vec<_> = accounts
            .map(|account| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.charge(account, 1).await })
            })
            .collect();

        for handle in handles {
            handle
                .await
                .expect("Task panicked")
                .expect("Charge rejected");
        }
    });
}

/// 1,000 concurrent charges against one account
#[divan::bench]
fn single_account_contention() {
    charge_all(std::iter::repeat(1).take(1_000));
}

/// 1,000 concurrent charges against 1,000 distinct accounts
#[divan::bench]
fn distinct_accounts() {
    charge_all(1..=1_000);
}

/// 1,000 concurrent charges spread over 10 accounts
#[divan::bench]
fn ten_hot_accounts() {
    charge_all((0..1_000).map(|i| i % 10 + 1));
}
