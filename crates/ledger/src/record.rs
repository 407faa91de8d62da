//! The budget record of a single month and the operations mutating it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Catalog, DEFAULT_INCOME_NAME, LedgerError, Period, ResultLedger};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub icon: String,
    pub name: String,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeItem {
    pub name: String,
    pub amount: i64,
}

/// Expense whose name and amount are known but whose icon has not been
/// supplied yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingExpense {
    pub name: String,
    pub amount: i64,
}

/// Outcome of [`BudgetRecord::upsert_expense`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpenseUpsert {
    /// An existing line was incremented; `total` is its new amount.
    Updated { total: i64 },
    /// The name is new: the expense is parked until an icon is supplied.
    PendingCreation,
}

/// Outcome of [`BudgetRecord::upsert_income`]. `name` is the name of the
/// line as stored, which may differ from the one typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncomeUpsert {
    Updated { name: String, total: i64 },
    Created { name: String },
}

/// Expenses and incomes of one month.
///
/// Names are unique inside each list, compared case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    pub month: String,
    pub year: i32,
    #[serde(default)]
    pub expenses: Vec<ExpenseItem>,
    #[serde(default)]
    pub income: Vec<IncomeItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_expense: Option<PendingExpense>,
}

impl BudgetRecord {
    /// Empty record for `period`.
    pub fn new(period: Period) -> Self {
        Self {
            month: period.month_name().to_string(),
            year: period.year,
            expenses: Vec::new(),
            income: Vec::new(),
            pending_expense: None,
        }
    }

    /// Record for `period` pre-populated with the catalog lines, all at 0.
    pub fn with_catalog(period: Period, catalog: &Catalog) -> Self {
        let mut record = Self::new(period);
        record.expenses = catalog
            .expenses
            .iter()
            .map(|(icon, name)| ExpenseItem {
                icon: icon.to_string(),
                name: name.to_string(),
                amount: 0,
            })
            .collect();
        record.income = catalog
            .income
            .iter()
            .map(|name| IncomeItem {
                name: name.to_string(),
                amount: 0,
            })
            .collect();
        record
    }

    /// Period of the record, `None` if the stored month name is unknown.
    pub fn period(&self) -> Option<Period> {
        let month = self.month.parse().ok()?;
        Some(Period::new(month, self.year))
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }

    pub fn is_awaiting_icon(&self) -> bool {
        self.pending_expense.is_some()
    }

    /// Adds `amount` to the expense called `name`.
    ///
    /// An unknown name does not create a line: it becomes the pending expense
    /// and [`materialize_pending_expense`] must be called with an icon. A
    /// previous pending request is replaced.
    ///
    /// [`materialize_pending_expense`]: BudgetRecord::materialize_pending_expense
    pub fn upsert_expense(&mut self, name: &str, amount: i64) -> ResultLedger<ExpenseUpsert> {
        if let Some(item) = self.expenses.iter_mut().find(|e| same_name(&e.name, name)) {
            item.amount = checked_add(item.amount, amount, &item.name)?;
            return Ok(ExpenseUpsert::Updated { total: item.amount });
        }

        self.pending_expense = Some(PendingExpense {
            name: name.to_string(),
            amount,
        });
        Ok(ExpenseUpsert::PendingCreation)
    }

    /// Turns the pending expense into a line with the given icon and clears
    /// the pending state.
    pub fn materialize_pending_expense(&mut self, icon: &str) -> ResultLedger<&ExpenseItem> {
        let Some(pending) = self.pending_expense.as_ref() else {
            return Err(LedgerError::NoPendingExpense);
        };

        let index = match self
            .expenses
            .iter()
            .position(|e| same_name(&e.name, &pending.name))
        {
            Some(index) => {
                let item = &mut self.expenses[index];
                item.amount = checked_add(item.amount, pending.amount, &item.name)?;
                index
            }
            None => {
                self.expenses.push(ExpenseItem {
                    icon: icon.to_string(),
                    name: pending.name.clone(),
                    amount: pending.amount,
                });
                self.expenses.len() - 1
            }
        };

        self.pending_expense = None;
        Ok(&self.expenses[index])
    }

    /// Adds `amount` to the income called `name`, creating it when missing.
    /// An empty name falls back to [`DEFAULT_INCOME_NAME`].
    pub fn upsert_income(&mut self, name: &str, amount: i64) -> ResultLedger<IncomeUpsert> {
        let name = if name.trim().is_empty() {
            DEFAULT_INCOME_NAME
        } else {
            name
        };

        if let Some(item) = self.income.iter_mut().find(|i| same_name(&i.name, name)) {
            item.amount = checked_add(item.amount, amount, &item.name)?;
            return Ok(IncomeUpsert::Updated {
                name: item.name.clone(),
                total: item.amount,
            });
        }

        self.income.push(IncomeItem {
            name: name.to_string(),
            amount,
        });
        Ok(IncomeUpsert::Created {
            name: name.to_string(),
        })
    }

    /// Removes the first expense called `name` (case-insensitive) and returns
    /// it, `None` if there is no such expense.
    pub fn delete_expense(&mut self, name: &str) -> Option<ExpenseItem> {
        let index = self.expenses.iter().position(|e| same_name(&e.name, name))?;
        Some(self.expenses.remove(index))
    }

    pub fn total_expenses(&self) -> i64 {
        self.expenses
            .iter()
            .fold(0i64, |acc, e| acc.saturating_add(e.amount))
    }

    pub fn total_income(&self) -> i64 {
        self.income
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.amount))
    }

    pub fn balance(&self) -> i64 {
        self.total_income().saturating_sub(self.total_expenses())
    }
}

/// Fresh record for the month following `today`.
///
/// The new period is always derived from the calendar, never from the month of
/// whatever record is currently open.
pub fn start_new_month(today: NaiveDate, catalog: &Catalog) -> BudgetRecord {
    BudgetRecord::with_catalog(Period::containing(today).next(), catalog)
}

fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

fn checked_add(current: i64, amount: i64, name: &str) -> ResultLedger<i64> {
    current
        .checked_add(amount)
        .ok_or_else(|| LedgerError::AmountOverflow(name.to_string()))
}
