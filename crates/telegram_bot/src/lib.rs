//! Telegram bot.
//!
//! Every text message is one turn of the [`Bookkeeper`]: the bot only relays
//! the text and sends back the replies.

use storage::Storage;
use teloxide::prelude::*;

pub mod commands;
mod handlers;
pub mod turn;
mod ui;

pub use turn::{Bookkeeper, BookkeeperOptions, Turn};

#[derive(Clone)]
pub struct ConfigParameters {
    allowed_users: Option<Vec<UserId>>,
    bookkeeper: Bookkeeper<Storage>,
}

pub struct Bot {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    bookkeeper: Bookkeeper<Storage>,
}

impl Bot {
    pub fn new(
        token: &str,
        allowed_users: Option<Vec<UserId>>,
        storage: Storage,
        options: BookkeeperOptions,
    ) -> Result<Self, String> {
        if token.trim().is_empty() {
            return Err("missing telegram token".to_string());
        }

        Ok(Self {
            token: token.to_string(),
            allowed_users,
            bookkeeper: Bookkeeper::new(storage, options),
        })
    }

    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);

        let parameters = ConfigParameters {
            allowed_users: self.allowed_users.clone(),
            bookkeeper: self.bookkeeper.clone(),
        };

        let handler =
            dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default, Debug)]
pub struct BotBuilder {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    storage: Option<Storage>,
    options: BookkeeperOptions,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn allowed_users(mut self, allowed_users: Vec<u64>) -> BotBuilder {
        if !allowed_users.is_empty() {
            self.allowed_users = Some(allowed_users.into_iter().map(UserId).collect());
        }
        self
    }

    pub fn storage(mut self, storage: Storage) -> BotBuilder {
        self.storage = Some(storage);
        self
    }

    pub fn options(mut self, options: BookkeeperOptions) -> BotBuilder {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        let storage = self
            .storage
            .ok_or_else(|| "missing storage backend".to_string())?;
        Bot::new(&self.token, self.allowed_users, storage, self.options)
    }
}
