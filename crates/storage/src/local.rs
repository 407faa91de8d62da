//! Directory backed store: every key is a file under `root`.

use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use tokio::fs;

use crate::{BlobStore, ResultStorage, StorageError};

#[derive(Clone, Debug)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &str) -> ResultStorage<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::Unavailable(format!("invalid key {key}")));
        }
        Ok(self.root.join(relative))
    }
}

impl BlobStore for LocalStore {
    async fn get(&self, key: &str) -> ResultStorage<Option<Vec<u8>>> {
        let path = self.path(key)?;
        match fs::read(&path).await {
            Ok(body) => Ok(Some(body)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> ResultStorage<()> {
        let path = self.path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, body).await?;
        if fs::rename(&tmp, &path).await.is_err() {
            fs::copy(&tmp, &path).await?;
            let _ = fs::remove_file(&tmp).await;
        }
        Ok(())
    }
}
