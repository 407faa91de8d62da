//! Calendar month a budget record refers to.

use std::fmt;

use chrono::{Datelike, Month, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("unknown month \"{0}\"")]
    UnknownMonth(String),
    #[error("invalid year \"{0}\"")]
    InvalidYear(String),
}

/// A month of a given year, e.g. October 2026.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Period {
    pub month: Month,
    pub year: i32,
}

// Russian month stems. Matching on the stem accepts the nominative
// ("январь"), genitive ("января") and locative ("январе") forms.
const RU_MONTH_STEMS: [(&str, Month); 12] = [
    ("январ", Month::January),
    ("феврал", Month::February),
    ("март", Month::March),
    ("апрел", Month::April),
    ("ма", Month::May),
    ("июн", Month::June),
    ("июл", Month::July),
    ("август", Month::August),
    ("сентябр", Month::September),
    ("октябр", Month::October),
    ("ноябр", Month::November),
    ("декабр", Month::December),
];

impl Period {
    pub fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }

    /// Period containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let month = Month::try_from(date.month() as u8).unwrap_or(Month::January);
        Self::new(month, date.year())
    }

    /// The following calendar month. December wraps to January of the next
    /// year.
    pub fn next(self) -> Self {
        match self.month {
            Month::December => Self::new(Month::January, self.year + 1),
            month => Self::new(month.succ(), self.year),
        }
    }

    /// Parses a month name (English or Russian) and a year.
    pub fn parse(month: &str, year: &str) -> Result<Self, PeriodError> {
        let month = parse_month(month)?;
        let year = year
            .parse::<i32>()
            .ok()
            .filter(|y| (1..=9999).contains(y))
            .ok_or_else(|| PeriodError::InvalidYear(year.to_string()))?;
        Ok(Self::new(month, year))
    }

    /// English month name, as stored in the `month` field of a record.
    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }

    /// Human readable label, e.g. `October 2026`.
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }

    /// Blob name of the record for this period, e.g. `budget_October_2026.json`.
    pub fn file_name(&self) -> String {
        format!("budget_{}_{}.json", self.month_name(), self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

fn parse_month(raw: &str) -> Result<Month, PeriodError> {
    if let Ok(month) = raw.parse::<Month>() {
        return Ok(month);
    }

    let lower = raw.to_lowercase();
    // "ма" is a prefix of "март", so "май"/"мая"/"мае" need an exact match.
    if matches!(lower.as_str(), "май" | "мая" | "мае") {
        return Ok(Month::May);
    }
    RU_MONTH_STEMS
        .iter()
        .filter(|(stem, _)| *stem != "ма")
        .find_map(|(stem, month)| {
            let suffix = lower.strip_prefix(stem)?;
            (suffix.chars().count() <= 1).then_some(*month)
        })
        .ok_or_else(|| PeriodError::UnknownMonth(raw.to_string()))
}
