//! Free-text command interpreter.
//!
//! Every message is matched, case-insensitively, against a small set of
//! keyword prefixes, each accepted in English or Russian. The first match
//! wins, in this order: `new month`, `expense`, `income`, `delete`, `edit`.
//! While an expense waits for its icon every message is read as the icon.

use ledger::{Period, PeriodError};

const NEW_MONTH: [&str; 2] = ["new month", "новый месяц"];
const EXPENSE: [&str; 2] = ["expense", "расход"];
const INCOME: [&str; 2] = ["income", "доход"];
const DELETE: [&str; 2] = ["delete", "удали"];
const EDIT: [&str; 2] = ["edit", "редактировать"];

const VARIATION_SELECTOR: char = '\u{FE0F}';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SetExpenseIcon { icon: String },
    StartNewMonth,
    AddExpense { amount: i64, name: String },
    AddIncome { amount: i64, name: String },
    DeleteExpense { name: String },
    EditMonth { period: Period },
    Help,
}

/// Command a [`ParseError`] refers to, used to pick the usage hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Usage {
    Icon,
    Expense,
    Income,
    Delete,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("missing arguments")]
    MissingArguments(Usage),
    #[error("invalid amount \"{token}\"")]
    InvalidAmount { usage: Usage, token: String },
    #[error("unknown month \"{0}\"")]
    UnknownMonth(String),
    #[error("invalid year \"{0}\"")]
    InvalidYear(String),
}

impl ParseError {
    pub fn usage(&self) -> Usage {
        match self {
            ParseError::MissingArguments(usage) => *usage,
            ParseError::InvalidAmount { usage, .. } => *usage,
            ParseError::UnknownMonth(_) | ParseError::InvalidYear(_) => Usage::Edit,
        }
    }
}

impl From<PeriodError> for ParseError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::UnknownMonth(raw) => ParseError::UnknownMonth(raw),
            PeriodError::InvalidYear(raw) => ParseError::InvalidYear(raw),
        }
    }
}

/// Splits `input` on runs of whitespace.
pub fn tokenize(input: &str) -> Vec<&str> {
    input.split_whitespace().collect()
}

/// Interprets one message.
///
/// `awaiting_icon` is true while the open record has a pending expense.
pub fn parse_command(text: &str, awaiting_icon: bool) -> Result<Command, ParseError> {
    let text = text.trim();
    if awaiting_icon {
        return parse_icon(text);
    }

    let tokens = tokenize(text);
    let normalized = tokens.join(" ").to_lowercase();
    let starts_with = |keywords: &[&str]| keywords.iter().any(|k| normalized.starts_with(k));

    if starts_with(&NEW_MONTH) {
        Ok(Command::StartNewMonth)
    } else if starts_with(&EXPENSE) {
        let (amount, name) = amount_and_name(&tokens, Usage::Expense)?;
        if name.is_empty() {
            return Err(ParseError::MissingArguments(Usage::Expense));
        }
        Ok(Command::AddExpense { amount, name })
    } else if starts_with(&INCOME) {
        let (amount, name) = amount_and_name(&tokens, Usage::Income)?;
        Ok(Command::AddIncome { amount, name })
    } else if starts_with(&DELETE) {
        let name = tokens.get(1..).unwrap_or_default().join(" ");
        if name.is_empty() {
            return Err(ParseError::MissingArguments(Usage::Delete));
        }
        Ok(Command::DeleteExpense { name })
    } else if starts_with(&EDIT) {
        let [_, month, year, ..] = tokens.as_slice() else {
            return Err(ParseError::MissingArguments(Usage::Edit));
        };
        let period = Period::parse(month, year)?;
        Ok(Command::EditMonth { period })
    } else {
        Ok(Command::Help)
    }
}

fn parse_icon(text: &str) -> Result<Command, ParseError> {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return Err(ParseError::MissingArguments(Usage::Icon));
    };

    let mut icon = first.to_string();
    icon.extend(chars.take_while(|c| *c == VARIATION_SELECTOR));
    Ok(Command::SetExpenseIcon { icon })
}

fn amount_and_name(tokens: &[&str], usage: Usage) -> Result<(i64, String), ParseError> {
    let Some(raw) = tokens.get(1) else {
        return Err(ParseError::MissingArguments(usage));
    };
    let amount = parse_amount(raw).ok_or_else(|| ParseError::InvalidAmount {
        usage,
        token: raw.to_string(),
    })?;
    let name = tokens.get(2..).unwrap_or_default().join(" ");
    Ok((amount, name))
}

/// Base-10 integer, optional sign, no separators.
fn parse_amount(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
