use crate::core::{LedgerConfig, DEFAULT_MAX_BALANCE};
use crate::replay::{OutputMode, ReplayConfig};
use crate::types::{LedgerError, Points};
use clap::Parser;
use std::path::PathBuf;

/// Replay charge/use operations against a concurrent point ledger
#[derive(Parser, Debug)]
#[command(name = "point-ledger")]
#[command(about = "Replay charge/use operations against a concurrent point ledger", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file (type,account,amount)")]
    pub input_file: PathBuf,

    /// Balance ceiling enforced by the ledger
    #[arg(
        long = "max-balance",
        value_name = "POINTS",
        default_value_t = DEFAULT_MAX_BALANCE,
        allow_negative_numbers = true,
        help = "Maximum balance per account and per operation"
    )]
    pub max_balance: Points,

    /// Number of operations per batch
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of operations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of operations in flight
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of operations applied concurrently (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,

    /// Print the transaction history instead of balances
    #[arg(long = "history", help = "Output the transaction history instead of balances")]
    pub history: bool,
}

impl CliArgs {
    /// Create a ReplayConfig from CLI arguments
    ///
    /// Missing values fall back to defaults; zero values are replaced by
    /// defaults with a warning.
    pub fn to_replay_config(&self) -> ReplayConfig {
        if self.batch_size.is_some() || self.max_concurrent.is_some() {
            let default = ReplayConfig::default();
            ReplayConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent.unwrap_or(default.max_concurrent),
            )
        } else {
            ReplayConfig::default()
        }
    }

    /// Create a LedgerConfig from CLI arguments
    ///
    /// # Errors
    ///
    /// `LedgerError::InvalidConfig` if `--max-balance` is not positive.
    pub fn to_ledger_config(&self) -> Result<LedgerConfig, LedgerError> {
        LedgerConfig::new(self.max_balance)
    }

    /// Which output the user asked for
    pub fn output_mode(&self) -> OutputMode {
        if self.history {
            OutputMode::History
        } else {
            OutputMode::Balances
        }
    }
}
