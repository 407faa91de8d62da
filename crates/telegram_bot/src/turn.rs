//! One conversation turn: load the month, interpret the message, apply it,
//! render the summary and save the record back.
//!
//! Nothing is kept in memory between turns. The pending expense lives in the
//! record itself, so the second step of the "new expense" dialog works
//! across restarts.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use ledger::{
    BudgetRecord, Catalog, ExpenseUpsert, IncomeUpsert, LedgerError, Period, render,
    start_new_month,
};
use storage::{BlobStore, RecordKey, load_record, save_record};

use crate::{
    commands::{Command, parse_command},
    ui,
};

/// Options shared by every turn.
#[derive(Clone, Debug)]
pub struct BookkeeperOptions {
    /// Folder (or key prefix) records are stored under.
    pub namespace: Option<String>,
    /// Keep one ledger per Telegram user instead of a shared one.
    pub per_user: bool,
    /// Lines pre-populated in a fresh month.
    pub catalog: Catalog,
    pub currency: String,
    /// Time zone used to decide what "this month" is.
    pub timezone: Tz,
}

impl Default for BookkeeperOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            per_user: true,
            catalog: Catalog::empty(),
            currency: "₽".to_string(),
            timezone: chrono_tz::Europe::Moscow,
        }
    }
}

/// Result of a turn: the record left open and the replies to send, in order.
#[derive(Debug)]
pub struct Turn {
    pub record: BudgetRecord,
    pub replies: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Bookkeeper<S> {
    store: S,
    options: Arc<BookkeeperOptions>,
}

/// Record open during a turn.
struct Active {
    key: RecordKey,
    record: BudgetRecord,
    dirty: bool,
    /// Stand-in for a record that could not be read; never saved.
    detached: bool,
}

enum Outcome {
    /// Acknowledgement followed by the rendered summary.
    Applied(String),
    /// A single message, nothing else to show.
    Message(String),
}

impl<S: BlobStore> Bookkeeper<S> {
    pub fn new(store: S, options: BookkeeperOptions) -> Self {
        Self {
            store,
            options: Arc::new(options),
        }
    }

    /// Handles `text` sent by `user_id`, using the current date in the
    /// configured time zone.
    pub async fn handle(&self, user_id: u64, text: &str) -> Turn {
        let today = Utc::now().with_timezone(&self.options.timezone).date_naive();
        self.handle_at(user_id, text, today).await
    }

    /// Same as [`handle`](Bookkeeper::handle) with an explicit date.
    pub async fn handle_at(&self, user_id: u64, text: &str, today: NaiveDate) -> Turn {
        let period = Period::containing(today);
        let key = self.key(user_id, period);

        let mut warnings = Vec::new();
        let loaded = load_record(&self.store, &key).await;
        let (record, created, detached) = match loaded {
            Ok(Some(record)) => (record, false, false),
            Ok(None) => {
                tracing::info!("creating budget {key}");
                (self.fresh(period), true, false)
            }
            Err(err) => {
                tracing::error!("failed to load {key}: {err}");
                warnings.push(ui::load_failed(&period));
                (self.fresh(period), false, true)
            }
        };

        let mut active = Active {
            key,
            record,
            dirty: created,
            detached,
        };

        let parsed = parse_command(text, active.record.is_awaiting_icon());
        let outcome = match parsed {
            Ok(command) => {
                tracing::debug!(user_id, ?command, "applying command");
                self.apply(command, user_id, today, &mut active, &mut warnings)
                    .await
            }
            Err(err) => {
                tracing::debug!(user_id, "rejected message: {err}");
                Outcome::Message(ui::parse_error(&err))
            }
        };

        let mut replies = match outcome {
            Outcome::Applied(ack) => vec![ack, render(&active.record, &self.options.currency)],
            Outcome::Message(message) => vec![message],
        };

        warnings.extend(self.persist(&active).await);
        replies.extend(warnings);

        Turn {
            record: active.record,
            replies,
        }
    }

    async fn apply(
        &self,
        command: Command,
        user_id: u64,
        today: NaiveDate,
        active: &mut Active,
        warnings: &mut Vec<String>,
    ) -> Outcome {
        let currency = self.options.currency.as_str();
        let record = &mut active.record;

        match command {
            Command::SetExpenseIcon { icon } => match record.materialize_pending_expense(&icon) {
                Ok(item) => {
                    let ack = ui::expense_added(item, currency);
                    active.dirty = true;
                    Outcome::Applied(ack)
                }
                Err(LedgerError::NoPendingExpense) => {
                    Outcome::Message(ui::nothing_pending().to_string())
                }
                Err(LedgerError::AmountOverflow(name)) => {
                    Outcome::Message(ui::amount_overflow(&name))
                }
            },
            Command::AddExpense { amount, name } => match record.upsert_expense(&name, amount) {
                Ok(ExpenseUpsert::Updated { total }) => {
                    active.dirty = true;
                    Outcome::Applied(ui::expense_updated(&name, amount, total, currency))
                }
                Ok(ExpenseUpsert::PendingCreation) => {
                    active.dirty = true;
                    Outcome::Applied(ui::expense_needs_icon(&name, amount, currency))
                }
                Err(err) => Outcome::Message(ui::amount_overflow(&overflowed(err, &name))),
            },
            Command::AddIncome { amount, name } => match record.upsert_income(&name, amount) {
                Ok(IncomeUpsert::Updated { name, total }) => {
                    active.dirty = true;
                    Outcome::Applied(ui::income_updated(&name, amount, total, currency))
                }
                Ok(IncomeUpsert::Created { name }) => {
                    active.dirty = true;
                    Outcome::Applied(ui::income_added(&name, amount, currency))
                }
                Err(err) => Outcome::Message(ui::amount_overflow(&overflowed(err, &name))),
            },
            Command::DeleteExpense { name } => match record.delete_expense(&name) {
                Some(item) => {
                    active.dirty = true;
                    Outcome::Applied(ui::expense_deleted(&item))
                }
                None => Outcome::Message(ui::expense_not_found(&name)),
            },
            Command::StartNewMonth => {
                let fresh = start_new_month(today, &self.options.catalog);
                let period = Period::containing(today).next();
                self.switch(active, self.key(user_id, period), fresh, true, warnings)
                    .await;
                Outcome::Applied(ui::month_started(&period))
            }
            Command::EditMonth { period } => {
                let key = self.key(user_id, period);
                if key == active.key {
                    return Outcome::Applied(ui::month_opened(&period));
                }
                let loaded = load_record(&self.store, &key).await;
                match loaded {
                    Ok(Some(loaded)) => {
                        self.switch(active, key, loaded, false, warnings).await;
                        Outcome::Applied(ui::month_opened(&period))
                    }
                    Ok(None) => Outcome::Message(ui::month_not_found(&period)),
                    Err(err) => {
                        tracing::error!("failed to load {key}: {err}");
                        Outcome::Message(ui::load_failed(&period))
                    }
                }
            }
            Command::Help => Outcome::Message(ui::help_text().to_string()),
        }
    }

    /// Makes `record` the open record, saving the previous one first if it
    /// has unsaved changes.
    async fn switch(
        &self,
        active: &mut Active,
        key: RecordKey,
        record: BudgetRecord,
        dirty: bool,
        warnings: &mut Vec<String>,
    ) {
        warnings.extend(self.persist(active).await);
        *active = Active {
            key,
            record,
            dirty,
            detached: false,
        };
    }

    /// Saves the open record if it has unsaved changes. A failure is logged
    /// and turned into a warning reply; it never aborts the turn.
    async fn persist(&self, active: &Active) -> Option<String> {
        if !active.dirty {
            return None;
        }
        if active.detached {
            tracing::warn!("not saving {}: the stored copy could not be read", active.key);
            return None;
        }
        match save_record(&self.store, &active.key, &active.record).await {
            Ok(()) => None,
            Err(err) => {
                tracing::error!("failed to save {}: {err}", active.key);
                Some(ui::save_failed(&active.record.label()))
            }
        }
    }

    fn key(&self, user_id: u64, period: Period) -> RecordKey {
        let user = self.options.per_user.then_some(user_id);
        RecordKey::new(self.options.namespace.as_deref(), user, period)
    }

    fn fresh(&self, period: Period) -> BudgetRecord {
        BudgetRecord::with_catalog(period, &self.options.catalog)
    }
}

fn overflowed(err: LedgerError, fallback: &str) -> String {
    match err {
        LedgerError::AmountOverflow(name) => name,
        LedgerError::NoPendingExpense => fallback.to_string(),
    }
}
