//! Concurrent replay of an operations file
//!
//! This module drives a `LedgerService` from a CSV file of charge/use rows and
//! writes the resulting balances (or history) as CSV.
//!
//! # Architecture
//!
//! ```text
//! run_file
//!     ├── ReplayConfig (batch_size, max_concurrent)
//!     ├── AsyncReader (batch CSV reading)
//!     └── Replayer (bounded concurrent submission)
//!         └── LedgerService (per-account serialization)
//! ```
//!
//! # Ordering
//!
//! Batches are replayed one after another, so a batch boundary is an ordering
//! barrier. Inside a batch every row is submitted concurrently on its own
//! task; rows touching the same account are applied in whatever order their
//! lock requests are granted. A batch size of 1 replays the file strictly in
//! order.

mod replayer;

pub use replayer::{ReplaySummary, Replayer};

use crate::core::{LedgerConfig, LedgerService};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{write_balances_csv, write_history_csv};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Configuration for batch replay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Number of rows per batch
    pub batch_size: usize,
    /// Maximum number of operations in flight at once
    pub max_concurrent: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl ReplayConfig {
    /// Create a new ReplayConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                default = default.batch_size,
                "invalid batch_size 0, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            warn!(
                default = default.max_concurrent,
                "invalid max_concurrent 0, using default"
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// What to write once the file has been replayed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// One row per account: account, balance
    #[default]
    Balances,
    /// One row per history record: id, account, amount, kind, timestamp
    History,
}

/// Replay an operations file against a fresh in-memory ledger
///
/// Builds a multi-threaded tokio runtime with `max_concurrent` workers, replays
/// the file batch by batch and writes the requested output.
///
/// # Errors
///
/// Fatal errors only: the runtime cannot be built, the input cannot be opened,
/// or the output cannot be written. Rejected and malformed rows are logged and
/// counted in the returned summary.
pub fn run_file(
    input_path: &Path,
    ledger_config: LedgerConfig,
    replay_config: ReplayConfig,
    mode: OutputMode,
    output: &mut dyn Write,
) -> Result<ReplaySummary, LedgerError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(replay_config.max_concurrent)
        .build()?;

    runtime.block_on(async {
        let ledger = LedgerService::in_memory(ledger_config);
        let replayer = Replayer::new(ledger.clone(), replay_config.max_concurrent);

        let file = tokio::fs::File::open(input_path)
            .await
            .map_err(|e| LedgerError::Io {
                message: format!("Failed to open file '{}': {}", input_path.display(), e),
            })?;

        // Wrap tokio file in a compatibility layer for csv-async
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = AsyncReader::new(compat_file);

        let mut summary = ReplaySummary::default();
        loop {
            let batch = reader.read_batch(replay_config.batch_size).await;
            if batch.is_empty() {
                break;
            }

            // Wait for the whole batch before reading the next one
            summary.merge(replayer.replay_batch(batch).await);
        }
        summary.skipped = reader.skipped();

        info!(
            applied = summary.applied,
            rejected = summary.rejected,
            skipped = summary.skipped,
            "replay finished"
        );

        match mode {
            OutputMode::Balances => write_balances_csv(&ledger.balances(), output)?,
            OutputMode::History => write_history_csv(&ledger.history(), output)?,
        }

        Ok(summary)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_replay_config_zero_values_fall_back_to_defaults() {
        let config = ReplayConfig::new(0, 0);

        assert_eq!(config, ReplayConfig::default());
    }

    #[test]
    fn test_replay_config_keeps_custom_values() {
        let config = ReplayConfig::new(5, 3);

        assert_eq!(config.batch_size, 5);
        assert_eq!(config.max_concurrent, 3);
    }

    #[test]
    fn test_run_file_writes_balances() {
        let file = create_temp_csv("type,account,amount\ncharge,2,200\ncharge,1,100\nuse,1,40\n");
        let mut output = Vec::new();

        let summary = run_file(
            file.path(),
            LedgerConfig::default(),
            ReplayConfig::new(1, 2),
            OutputMode::Balances,
            &mut output,
        )
        .unwrap();

        assert_eq!(summary.applied, 3);
        assert_eq!(summary.rejected, 0);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,balance\n1,60\n2,200\n"
        );
    }

    #[test]
    fn test_run_file_writes_history() {
        let file = create_temp_csv("type,account,amount\ncharge,1,100\nuse,1,40\n");
        let mut output = Vec::new();

        run_file(
            file.path(),
            LedgerConfig::default(),
            ReplayConfig::new(1, 2),
            OutputMode::History,
            &mut output,
        )
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,account,amount,kind,timestamp");
        assert!(lines[1].starts_with("1,1,100,charge,"));
        assert!(lines[2].starts_with("2,1,40,use,"));
    }

    #[test]
    fn test_run_file_counts_rejections_and_skips() {
        let file = create_temp_csv(
            "type,account,amount\ncharge,1,100\nuse,1,500\ncharge,0,5\nrefund,1,5\n",
        );
        let mut output = Vec::new();

        let summary = run_file(
            file.path(),
            LedgerConfig::default(),
            ReplayConfig::new(1, 2),
            OutputMode::Balances,
            &mut output,
        )
        .unwrap();

        assert_eq!(summary.applied, 1);
        assert_eq!(summary.rejected, 2);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_run_file_handles_missing_file() {
        let mut output = Vec::new();

        let result = run_file(
            Path::new("nonexistent.csv"),
            LedgerConfig::default(),
            ReplayConfig::default(),
            OutputMode::Balances,
            &mut output,
        );

        let error = result.unwrap_err();
        assert!(matches!(error, LedgerError::Io { .. }));
        assert!(error.to_string().contains("Failed to open file"));
    }
}
