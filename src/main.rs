//! Point Ledger CLI
//!
//! Replays charge/use operations from a CSV file against a concurrent point
//! ledger and prints the resulting balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > balances.csv
//! cargo run -- --max-balance 100000 operations.csv > balances.csv
//! cargo run -- --batch-size 1 operations.csv > balances.csv
//! cargo run -- --history operations.csv > history.csv
//! RUST_LOG=debug cargo run -- operations.csv
//! ```
//!
//! Input columns are `type,account,amount`, where `type` is `charge` or `use`.
//! Rejected and malformed rows are logged to stderr and skipped.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid configuration, file not found, output not writable, etc.)

use point_ledger::cli;
use point_ledger::replay;
use std::process;

fn main() {
    cli::init_logging();

    let args = cli::parse_args();

    let ledger_config = match args.to_ledger_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut output = std::io::stdout();
    if let Err(e) = replay::run_file(
        &args.input_file,
        ledger_config,
        args.to_replay_config(),
        args.output_mode(),
        &mut output,
    ) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
