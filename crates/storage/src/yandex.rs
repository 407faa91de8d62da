//! Yandex Disk REST backend.
//!
//! Downloads and uploads go through a two step protocol: the API hands out a
//! one-shot `href`, the body is then fetched from or sent to that link.

use reqwest::{Client, StatusCode, header};
use serde::Deserialize;

use crate::{BlobStore, ResultStorage, StorageError};

const DEFAULT_API_URL: &str = "https://cloud-api.yandex.net/v1/disk";

#[derive(Clone, Debug)]
pub struct YandexDisk {
    client: Client,
    api_url: String,
    root: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl YandexDisk {
    /// Client authenticated with an OAuth `token`. Keys are resolved under
    /// `root`, e.g. `disk:` or `app:`.
    pub fn new(token: &str, root: &str) -> Result<Self, String> {
        let mut auth = header::HeaderValue::try_from(format!("OAuth {token}"))
            .map_err(|err| format!("invalid auth header value: {err}"))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;

        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            root: root.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the API base url.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn disk_path(&self, key: &str) -> String {
        let key = key.trim_start_matches('/');
        if self.root.is_empty() {
            format!("/{key}")
        } else {
            format!("{}/{key}", self.root)
        }
    }

    async fn link(&self, path: &str, query: &[(&str, &str)]) -> ResultStorage<Option<Link>> {
        let resp = self.client.get(self.url(path)).query(query).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_success() {
            return Ok(Some(resp.json::<Link>().await?));
        }
        Err(server_error(resp).await)
    }

    async fn upload_link(&self, disk_path: &str) -> ResultStorage<Link> {
        let query = [("path", disk_path), ("overwrite", "true")];
        let resp = self
            .client
            .get(self.url("resources/upload"))
            .query(&query)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<Link>().await?);
        }
        if status != StatusCode::CONFLICT {
            return Err(server_error(resp).await);
        }

        // 409: the parent folder does not exist yet.
        if let Some((parent, _)) = disk_path.rsplit_once('/') {
            tracing::info!("creating folder {parent}");
            self.create_folder(parent).await?;
        }
        self.link("resources/upload", &query)
            .await?
            .ok_or_else(|| StorageError::Unavailable(format!("no upload link for {disk_path}")))
    }

    async fn create_folder(&self, disk_path: &str) -> ResultStorage<()> {
        let resp = self
            .client
            .put(self.url("resources"))
            .query(&[("path", disk_path)])
            .send()
            .await?;
        match resp.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Ok(()),
            _ => Err(server_error(resp).await),
        }
    }
}

impl BlobStore for YandexDisk {
    async fn get(&self, key: &str) -> ResultStorage<Option<Vec<u8>>> {
        let disk_path = self.disk_path(key);
        let Some(link) = self
            .link("resources/download", &[("path", disk_path.as_str())])
            .await?
        else {
            return Ok(None);
        };

        let resp = self.client.get(&link.href).send().await?;
        if !resp.status().is_success() {
            return Err(server_error(resp).await);
        }
        Ok(Some(resp.bytes().await?.to_vec()))
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> ResultStorage<()> {
        let disk_path = self.disk_path(key);
        let link = self.upload_link(&disk_path).await?;

        let resp = self.client.put(&link.href).body(body).send().await?;
        if !resp.status().is_success() {
            return Err(server_error(resp).await);
        }
        tracing::debug!("uploaded {disk_path}");
        Ok(())
    }
}

async fn server_error(resp: reqwest::Response) -> StorageError {
    let status = resp.status();
    let message = match resp.json::<ErrorBody>().await {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody {
            error: Some(error), ..
        }) => error,
        _ => "server error".to_string(),
    };
    tracing::debug!("yandex disk answered {status}: {message}");
    StorageError::Server { status, message }
}
