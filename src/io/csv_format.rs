//! CSV format handling for operation records and ledger output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Balance and history output serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{
    AccountId, BalanceRecord, HistoryRecord, LedgerError, OperationRecord, Points, TransactionKind,
};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, account, amount
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub account: AccountId,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to an OperationRecord
///
/// Only the shape of the row is checked here. Whether the account id and the
/// amount are acceptable is decided by the ledger, so that rejected rows are
/// reported with the same errors as any other caller would get.
///
/// # Returns
///
/// * `Ok(OperationRecord)` - Successfully converted record
/// * `Err(LedgerError::InvalidOperation)` - Unknown `type`
/// * `Err(LedgerError::Parse)` - Missing or non-integer amount
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<OperationRecord, LedgerError> {
    let kind = match csv_record.kind.trim().to_lowercase().as_str() {
        "charge" => TransactionKind::Charge,
        "use" => TransactionKind::Use,
        _ => return Err(LedgerError::invalid_operation(&csv_record.kind)),
    };

    let amount = match csv_record.amount.as_deref().map(str::trim) {
        Some(amount_str) if !amount_str.is_empty() => {
            amount_str.parse::<Points>().map_err(|_| LedgerError::Parse {
                line: None,
                message: format!(
                    "Invalid amount '{}' for account {}",
                    amount_str, csv_record.account
                ),
            })?
        }
        _ => {
            return Err(LedgerError::Parse {
                line: None,
                message: format!(
                    "{} for account {} requires an amount",
                    kind, csv_record.account
                ),
            })
        }
    };

    Ok(OperationRecord {
        kind,
        account_id: csv_record.account,
        amount,
    })
}

/// Write balances in CSV format
///
/// Writes records with columns: account, balance.
/// Records are sorted by account id for deterministic output.
pub fn write_balances_csv(
    balances: &[BalanceRecord],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account", "balance"])?;

    let mut sorted = balances.to_vec();
    sorted.sort_by_key(|record| record.account_id);

    for record in sorted {
        writer.write_record(&[record.account_id.to_string(), record.balance.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write history records in CSV format
///
/// Writes records with columns: id, account, amount, kind, timestamp.
/// Records are sorted by history id.
pub fn write_history_csv(
    history: &[HistoryRecord],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "account", "amount", "kind", "timestamp"])?;

    let mut sorted = history.to_vec();
    sorted.sort_by_key(|record| record.id);

    for record in sorted {
        writer.write_record(&[
            record.id.to_string(),
            record.account_id.to_string(),
            record.amount.to_string(),
            record.kind.to_string(),
            record.timestamp.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
