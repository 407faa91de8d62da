//! In-process store, used for dry runs and tests.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::sync::Mutex;

use crate::{BlobStore, ResultStorage, StorageError};

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, `get` fails with [`StorageError::Unavailable`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// While set, `put` fails with [`StorageError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn keys(&self) -> Vec<String> {
        let guard = self.blobs.lock().await;
        let mut keys: Vec<String> = guard.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn check(flag: &AtomicBool) -> ResultStorage<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

impl BlobStore for MemoryStore {
    async fn get(&self, key: &str) -> ResultStorage<Option<Vec<u8>>> {
        Self::check(&self.fail_reads)?;
        let guard = self.blobs.lock().await;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> ResultStorage<()> {
        Self::check(&self.fail_writes)?;
        let mut guard = self.blobs.lock().await;
        guard.insert(key.to_string(), body);
        Ok(())
    }
}
