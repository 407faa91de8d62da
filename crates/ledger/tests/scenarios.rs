use chrono::{Month, NaiveDate};

use ledger::{
    BudgetRecord, Catalog, ExpenseItem, ExpenseUpsert, IncomeItem, LedgerError, Period, render,
    start_new_month,
};

fn october() -> BudgetRecord {
    BudgetRecord::new(Period::new(Month::October, 2026))
}

#[test]
fn expense_amounts_add_up_after_creation() {
    let mut record = october();
    assert_eq!(
        record.upsert_expense("Coffee", 150),
        Ok(ExpenseUpsert::PendingCreation)
    );
    record.materialize_pending_expense("☕").unwrap();
    assert_eq!(
        record.upsert_expense("Coffee", 90),
        Ok(ExpenseUpsert::Updated { total: 240 })
    );
    assert_eq!(record.expenses.len(), 1);
    assert_eq!(record.expenses[0].amount, 240);
}

#[test]
fn salary_twice_is_one_entry() {
    let mut record = october();
    record.upsert_income("Salary", 1000).unwrap();
    record.upsert_income("Salary", 500).unwrap();
    assert_eq!(
        record.income,
        vec![IncomeItem {
            name: "Salary".to_string(),
            amount: 1500,
        }]
    );
}

#[test]
fn taxi_with_icon() {
    let mut record = october();
    assert_eq!(
        record.upsert_expense("Taxi", 300),
        Ok(ExpenseUpsert::PendingCreation)
    );
    record.materialize_pending_expense("🚗").unwrap();
    assert_eq!(
        record.expenses,
        vec![ExpenseItem {
            icon: "🚗".to_string(),
            name: "Taxi".to_string(),
            amount: 300,
        }]
    );
    assert!(record.pending_expense.is_none());
}

#[test]
fn icon_without_request_is_rejected() {
    let mut record = october();
    assert_eq!(
        record.materialize_pending_expense("🚗").map(|_| ()),
        Err(LedgerError::NoPendingExpense)
    );
}

#[test]
fn new_month_in_december_rolls_the_year() {
    let today = NaiveDate::from_ymd_opt(2030, 12, 15).unwrap();
    let record = start_new_month(today, &Catalog::empty());
    assert_eq!(record.period(), Some(Period::new(Month::January, 2031)));
}

#[test]
fn catalog_month_renders_every_line() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    let record = start_new_month(today, &Catalog::household());
    let text = render(&record, "₽");
    assert!(text.starts_with("💸 Expenses November 2026\n1. 🎁 Подарок — 0 ₽"));
    assert!(text.contains("13. 💅 Косметика — 0 ₽"));
    assert!(text.contains("3. Дополнительные доходы — 0 ₽"));
    assert!(!text.contains("none yet"));
}

#[test]
fn record_survives_json_round_trip() {
    let mut record = october();
    record.upsert_income("Salary", 1000).unwrap();
    record.upsert_expense("Taxi", 300).unwrap();

    let json = serde_json::to_string_pretty(&record).unwrap();
    let back: BudgetRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
    assert!(back.is_awaiting_icon());
}

#[test]
fn record_without_optional_fields_loads() {
    let json = r#"{"month":"May","year":2026}"#;
    let record: BudgetRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.period(), Some(Period::new(Month::May, 2026)));
    assert!(record.expenses.is_empty());
    assert!(record.pending_expense.is_none());
}
