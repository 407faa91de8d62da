//! Text summary of a record, as sent back to the chat.

use crate::BudgetRecord;

const NONE_YET: &str = "none yet";

/// Renders `record` using `currency` as the amount suffix.
///
/// The output depends only on the record, so rendering an unchanged record
/// twice yields the same text.
pub fn render(record: &BudgetRecord, currency: &str) -> String {
    let mut out = format!("💸 Expenses {}\n", record.label());
    if record.expenses.is_empty() {
        out.push_str(&format!("{NONE_YET}\n"));
    }
    for (index, item) in record.expenses.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} {} — {} {currency}\n",
            index + 1,
            item.icon,
            item.name,
            item.amount
        ));
    }
    if let Some(pending) = &record.pending_expense {
        out.push_str(&format!(
            "⏳ {} — {} {currency} (waiting for an icon)\n",
            pending.name, pending.amount
        ));
    }
    out.push_str(&format!("Total: {} {currency}\n", record.total_expenses()));

    out.push_str("\n💰 Income\n");
    if record.income.is_empty() {
        out.push_str(&format!("{NONE_YET}\n"));
    }
    for (index, item) in record.income.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} — {} {currency}\n",
            index + 1,
            item.name,
            item.amount
        ));
    }
    out.push_str(&format!("Total: {} {currency}\n", record.total_income()));

    out.push_str("\n🧾 Month summary\n");
    out.push_str(&format!("• Income: {} {currency}\n", record.total_income()));
    out.push_str(&format!("• Expenses: {} {currency}\n", record.total_expenses()));
    out.push_str(&format!("• Balance: {} {currency}", record.balance()));

    out
}
