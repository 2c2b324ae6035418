//! Balance policy checks
//!
//! Pure functions with no side effects. Each check fails with its own
//! `LedgerError` variant so callers can tell the reasons apart. The result
//! checks return the balance the operation would produce, computed with
//! checked arithmetic.

use crate::types::{AccountId, LedgerError, Points};

/// Reject non-positive account ids
pub fn validate_account_id(account_id: AccountId) -> Result<(), LedgerError> {
    if account_id <= 0 {
        return Err(LedgerError::invalid_account_id(account_id));
    }
    Ok(())
}

/// Reject amounts that are zero or negative
pub fn validate_amount_positive(account_id: AccountId, amount: Points) -> Result<(), LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::invalid_amount(account_id, amount));
    }
    Ok(())
}

/// Reject a single operation that moves more than the ceiling
pub fn validate_amount_within_ceiling(
    account_id: AccountId,
    amount: Points,
    max_balance: Points,
) -> Result<(), LedgerError> {
    if amount > max_balance {
        return Err(LedgerError::amount_too_large(account_id, amount, max_balance));
    }
    Ok(())
}

/// Check that charging `amount` keeps the balance at or below the ceiling
///
/// # Returns
///
/// * `Ok(new_balance)` - `current + amount`
/// * `Err(LedgerError::BalanceCeilingExceeded)` - if the sum exceeds `max_balance`
///   or overflows
pub fn validate_charge_result(
    account_id: AccountId,
    current: Points,
    amount: Points,
    max_balance: Points,
) -> Result<Points, LedgerError> {
    current
        .checked_add(amount)
        .filter(|balance| *balance <= max_balance)
        .ok_or_else(|| LedgerError::balance_ceiling_exceeded(account_id, current, amount, max_balance))
}

/// Check that using `amount` keeps the balance at or above zero
///
/// # Returns
///
/// * `Ok(new_balance)` - `current - amount`
/// * `Err(LedgerError::InsufficientBalance)` - if the result would be negative
pub fn validate_use_result(
    account_id: AccountId,
    current: Points,
    amount: Points,
) -> Result<Points, LedgerError> {
    current
        .checked_sub(amount)
        .filter(|balance| *balance >= 0)
        .ok_or_else(|| LedgerError::insufficient_balance(account_id, current, amount))
}
