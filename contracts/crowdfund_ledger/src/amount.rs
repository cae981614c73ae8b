//! Checked arithmetic over token amounts.
//!
//! Amounts are `i128` in the asset's smallest unit, matching the Soroban
//! token interface. Every value stored in a monetary field goes through these
//! helpers, so a stored amount is never negative and never wraps.

use crate::Error;

/// Reject zero and negative amounts with `err`.
pub fn require_positive(amount: i128, err: Error) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(err);
    }
    Ok(amount)
}

pub fn add(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_add(b).ok_or(Error::ArithmeticOverflow)
}

/// `a - b`, failing instead of going below zero.
pub fn sub(a: i128, b: i128) -> Result<i128, Error> {
    match a.checked_sub(b) {
        Some(diff) if diff >= 0 => Ok(diff),
        _ => Err(Error::ArithmeticOverflow),
    }
}
