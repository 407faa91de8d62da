//! Errors raised by ledger operations.
//!
//! - [`NoPendingExpense`] when an icon arrives but no expense waits for one.
//! - [`AmountOverflow`] when adding an amount would overflow the line total.
//!
//!  [`NoPendingExpense`]: LedgerError::NoPendingExpense
//!  [`AmountOverflow`]: LedgerError::AmountOverflow
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("no expense is waiting for an icon")]
    NoPendingExpense,
    #[error("amount overflow on \"{0}\"")]
    AmountOverflow(String),
}
