use ledger::Catalog;
use settings::{Settings, SettingsError, StorageSettings};
use storage::{LocalStore, MemoryStore, Storage, YandexDisk};
use telegram_bot::BookkeeperOptions;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budget_bot={level},telegram_bot={level},storage={level},ledger={level}",
            level = settings.app.level
        ))
        .init();

    let storage = build_storage(&settings.storage)?;
    let options = BookkeeperOptions {
        namespace: settings.ledger.namespace.clone(),
        per_user: settings.ledger.per_user,
        catalog: if settings.ledger.prefill_catalog {
            Catalog::household()
        } else {
            Catalog::empty()
        },
        currency: settings.ledger.currency.clone(),
        timezone: settings.timezone()?,
    };

    tracing::info!(
        "Using {} storage, one ledger per user: {}",
        settings.storage.kind(),
        options.per_user
    );

    let bot = telegram_bot::Bot::builder()
        .token(&settings.telegram.token)
        .allowed_users(settings.telegram.allowed_users.clone())
        .storage(storage)
        .options(options)
        .build()?;

    bot.run().await;
    Ok(())
}

fn build_storage(config: &StorageSettings) -> Result<Storage, SettingsError> {
    let storage = match config {
        StorageSettings::Yandex {
            token,
            root,
            api_url,
        } => {
            let disk = YandexDisk::new(token, root).map_err(SettingsError::Storage)?;
            match api_url {
                Some(url) => Storage::Yandex(disk.with_api_url(url)),
                None => Storage::Yandex(disk),
            }
        }
        StorageSettings::Local { path } => Storage::Local(LocalStore::new(path)),
        StorageSettings::Memory => {
            tracing::warn!("Using in-memory storage: budgets are lost on restart");
            Storage::Memory(MemoryStore::new())
        }
    };
    Ok(storage)
}
