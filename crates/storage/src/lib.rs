//! Persistence of budget records.
//!
//! Records are stored as JSON blobs in an opaque key-value store. The
//! [`BlobStore`] trait is the only thing the bot needs; [`Storage`] picks one
//! of the available backends at runtime.

use std::future::Future;

use ledger::{BudgetRecord, Period};

pub use error::StorageError;
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use yandex::YandexDisk;

mod error;
mod local;
mod memory;
mod yandex;

pub type ResultStorage<T> = Result<T, StorageError>;

/// Key-value blob store.
///
/// `get` answers `Ok(None)` when the key does not exist.
pub trait BlobStore: Clone + Send + Sync + 'static {
    fn get(&self, key: &str) -> impl Future<Output = ResultStorage<Option<Vec<u8>>>> + Send;

    fn put(&self, key: &str, body: Vec<u8>) -> impl Future<Output = ResultStorage<()>> + Send;
}

/// Backend chosen from the settings.
#[derive(Clone, Debug)]
pub enum Storage {
    Yandex(YandexDisk),
    Local(LocalStore),
    Memory(MemoryStore),
}

impl BlobStore for Storage {
    async fn get(&self, key: &str) -> ResultStorage<Option<Vec<u8>>> {
        match self {
            Storage::Yandex(store) => store.get(key).await,
            Storage::Local(store) => store.get(key).await,
            Storage::Memory(store) => store.get(key).await,
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> ResultStorage<()> {
        match self {
            Storage::Yandex(store) => store.put(key, body).await,
            Storage::Local(store) => store.put(key, body).await,
            Storage::Memory(store) => store.put(key, body).await,
        }
    }
}

/// Storage key of a record: `[<namespace>/][<user>_]budget_<Month>_<Year>.json`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(namespace: Option<&str>, user: Option<u64>, period: Period) -> Self {
        let mut key = String::new();
        if let Some(namespace) = namespace.map(|n| n.trim_matches('/')).filter(|n| !n.is_empty()) {
            key.push_str(namespace);
            key.push('/');
        }
        if let Some(user) = user {
            key.push_str(&format!("{user}_"));
        }
        key.push_str(&period.file_name());
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loads the record stored under `key`, `None` if there is none.
pub async fn load_record<S: BlobStore>(
    store: &S,
    key: &RecordKey,
) -> ResultStorage<Option<BudgetRecord>> {
    let Some(body) = store.get(key.as_str()).await? else {
        tracing::debug!("no record under {key}");
        return Ok(None);
    };
    let record = serde_json::from_slice(&body)?;
    Ok(Some(record))
}

/// Stores `record` under `key` as pretty-printed JSON.
pub async fn save_record<S: BlobStore>(
    store: &S,
    key: &RecordKey,
    record: &BudgetRecord,
) -> ResultStorage<()> {
    let body = serde_json::to_vec_pretty(record)?;
    store.put(key.as_str(), body).await?;
    tracing::debug!("saved record {key}");
    Ok(())
}
