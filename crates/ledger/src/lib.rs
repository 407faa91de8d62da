//! Monthly budget ledger.
//!
//! A [`BudgetRecord`] holds the expenses and incomes of one calendar month.
//! The crate knows nothing about chats or storage: callers load a record,
//! mutate it with the operations defined here and persist it again.

pub use catalog::Catalog;
pub use error::LedgerError;
pub use period::{Period, PeriodError};
pub use record::{
    BudgetRecord, ExpenseItem, ExpenseUpsert, IncomeItem, IncomeUpsert, PendingExpense,
    start_new_month,
};
pub use render::render;

mod catalog;
mod error;
mod period;
mod record;
mod render;

pub type ResultLedger<T> = Result<T, LedgerError>;

/// Label used for incomes added without a name.
pub const DEFAULT_INCOME_NAME: &str = "Income";
