use ledger::{ExpenseItem, Period};

use crate::commands::{ParseError, Usage};

pub(crate) fn help_text() -> &'static str {
    "Commands (English or Russian keywords):\n\n\
     expense 300 Taxi  (расход)\n\
     income 5000 Salary  (доход, name optional)\n\
     delete Taxi  (удали)\n\
     edit October 2026  (редактировать)\n\
     new month  (новый месяц)\n\n\
     A new expense asks for an emoji: reply with it to finish."
}

pub(crate) fn usage(usage: Usage) -> &'static str {
    match usage {
        Usage::Icon => "❌ Send an emoji to use as the expense icon.",
        Usage::Expense => "❌ Format: expense <amount> <name>, e.g. expense 300 Taxi",
        Usage::Income => "❌ Format: income <amount> [name], e.g. income 5000 Salary",
        Usage::Delete => "❌ Format: delete <name>, e.g. delete Taxi",
        Usage::Edit => "❌ Format: edit <month> <year>, e.g. edit October 2026",
    }
}

pub(crate) fn parse_error(err: &ParseError) -> String {
    match err {
        ParseError::MissingArguments(u) => usage(*u).to_string(),
        ParseError::InvalidAmount { usage: u, token } => {
            format!("❌ \"{token}\" is not a whole number.\n{}", usage(*u))
        }
        ParseError::UnknownMonth(raw) => {
            format!("❌ Unknown month \"{raw}\".\n{}", usage(Usage::Edit))
        }
        ParseError::InvalidYear(raw) => {
            format!("❌ Invalid year \"{raw}\".\n{}", usage(Usage::Edit))
        }
    }
}

pub(crate) fn expense_updated(name: &str, amount: i64, total: i64, currency: &str) -> String {
    format!("Expense \"{name}\": {amount:+} {currency} (total {total} {currency})")
}

pub(crate) fn expense_needs_icon(name: &str, amount: i64, currency: &str) -> String {
    format!("New expense \"{name}\" of {amount} {currency}. Send an emoji to use as its icon.")
}

pub(crate) fn expense_added(item: &ExpenseItem, currency: &str) -> String {
    format!(
        "Added expense {} {} — {} {currency}",
        item.icon, item.name, item.amount
    )
}

pub(crate) fn income_updated(name: &str, amount: i64, total: i64, currency: &str) -> String {
    format!("Income \"{name}\": {amount:+} {currency} (total {total} {currency})")
}

pub(crate) fn income_added(name: &str, amount: i64, currency: &str) -> String {
    format!("Added income \"{name}\": {amount} {currency}")
}

pub(crate) fn expense_deleted(item: &ExpenseItem) -> String {
    format!("Deleted expense {} {}", item.icon, item.name)
}

pub(crate) fn expense_not_found(name: &str) -> String {
    format!("Expense \"{name}\" not found.")
}

pub(crate) fn month_started(period: &Period) -> String {
    format!("Started a new budget for {period}.")
}

pub(crate) fn month_opened(period: &Period) -> String {
    format!("Opened the budget for {period}.")
}

pub(crate) fn month_not_found(period: &Period) -> String {
    format!("No budget saved for {period}.")
}

pub(crate) fn nothing_pending() -> &'static str {
    "No expense is waiting for an icon."
}

pub(crate) fn amount_overflow(name: &str) -> String {
    format!("❌ The amount of \"{name}\" is too large.")
}

pub(crate) fn load_failed(period: &Period) -> String {
    format!("⚠️ Could not load the budget for {period}. Try again later.")
}

pub(crate) fn save_failed(label: &str) -> String {
    format!("⚠️ The budget for {label} could not be saved. Changes shown above are not stored.")
}
