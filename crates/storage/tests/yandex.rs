use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::Month;
use ledger::{BudgetRecord, Period};
use serde_json::json;
use storage::{BlobStore, RecordKey, StorageError, YandexDisk, load_record, save_record};

const TOKEN: &str = "secret";

/// Just enough of the Disk API: link handshake, folders and file bodies.
#[derive(Clone, Default)]
struct Disk {
    base: String,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    folders: Arc<Mutex<HashSet<String>>>,
    links: Arc<Mutex<Vec<String>>>,
}

impl Disk {
    fn link(&self, path: &str) -> Response {
        let mut links = self.links.lock().unwrap();
        links.push(path.to_string());
        let href = format!("{}/files/{}", self.base, links.len() - 1);
        Json(json!({ "href": href, "templated": false })).into_response()
    }

    fn has_folder(&self, path: &str) -> bool {
        path.ends_with(':') || self.folders.lock().unwrap().contains(path)
    }

    fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("OAuth {TOKEN}");
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str())
}

fn parent(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

fn path_of(query: &HashMap<String, String>) -> String {
    query.get("path").cloned().unwrap_or_default()
}

async fn download_link(
    State(disk): State<Disk>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let path = path_of(&query);
    if disk.file(&path).is_none() {
        let body = json!({
            "message": "Resource not found.",
            "error": "DiskNotFoundError",
        });
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }
    disk.link(&path)
}

async fn upload_link(
    State(disk): State<Disk>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let path = path_of(&query);
    if !disk.has_folder(parent(&path)) {
        let body = json!({
            "message": "Parent folder doesn't exist.",
            "error": "DiskPathDoesntExistsError",
        });
        return (StatusCode::CONFLICT, Json(body)).into_response();
    }
    disk.link(&path)
}

async fn create_folder(
    State(disk): State<Disk>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let path = path_of(&query);
    if disk.has_folder(&path) {
        let body = json!({ "error": "DiskPathPointsToExistentDirectoryError" });
        return (StatusCode::CONFLICT, Json(body)).into_response();
    }
    disk.folders.lock().unwrap().insert(path);
    StatusCode::CREATED.into_response()
}

async fn fetch(State(disk): State<Disk>, Path(id): Path<usize>) -> Response {
    let path = disk.links.lock().unwrap().get(id).cloned();
    match path.and_then(|path| disk.file(&path)) {
        Some(body) => body.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn store(State(disk): State<Disk>, Path(id): Path<usize>, body: Bytes) -> StatusCode {
    let Some(path) = disk.links.lock().unwrap().get(id).cloned() else {
        return StatusCode::NOT_FOUND;
    };
    disk.files.lock().unwrap().insert(path, body.to_vec());
    StatusCode::CREATED
}

/// Serves the router built for the bound address and returns that address.
async fn spawn(router: impl FnOnce(String) -> Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let router = router(base.clone());

    tokio::spawn(async move { axum::serve(listener, router).await });

    base
}

async fn stub_disk() -> (YandexDisk, Disk) {
    let mut disk = Disk::default();
    let base = spawn(|base| {
        disk.base = base;
        Router::new()
            .route("/v1/disk/resources", put(create_folder))
            .route("/v1/disk/resources/download", get(download_link))
            .route("/v1/disk/resources/upload", get(upload_link))
            .route("/files/{id}", get(fetch).put(store))
            .with_state(disk.clone())
    })
    .await;

    (client(TOKEN, &base), disk)
}

fn client(token: &str, base: &str) -> YandexDisk {
    YandexDisk::new(token, "disk:")
        .unwrap()
        .with_api_url(&format!("{base}/v1/disk"))
}

fn server_error(err: StorageError) -> (u16, String) {
    match err {
        StorageError::Server { status, message } => (status.as_u16(), message),
        other => panic!("unexpected error: {other}"),
    }
}

fn october() -> Period {
    Period::new(Month::October, 2026)
}

#[tokio::test]
async fn download_follows_the_returned_link() {
    let (client, disk) = stub_disk().await;
    disk.files
        .lock()
        .unwrap()
        .insert("disk:/bot/notes.json".to_string(), b"{}".to_vec());

    let body = client.get("bot/notes.json").await.unwrap();
    assert_eq!(body, Some(b"{}".to_vec()));
}

#[tokio::test]
async fn missing_file_is_none() {
    let (client, _disk) = stub_disk().await;
    assert_eq!(client.get("bot/notes.json").await.unwrap(), None);
}

#[tokio::test]
async fn upload_creates_the_missing_folder() {
    let (client, disk) = stub_disk().await;
    let key = RecordKey::new(Some("bot"), Some(7), october());
    let mut record = BudgetRecord::new(october());
    record.upsert_income("Salary", 1000).unwrap();

    save_record(&client, &key, &record).await.unwrap();

    assert!(disk.folders.lock().unwrap().contains("disk:/bot"));
    assert!(disk.file("disk:/bot/7_budget_October_2026.json").is_some());
    assert_eq!(load_record(&client, &key).await.unwrap(), Some(record));
}

#[tokio::test]
async fn upload_overwrites_an_existing_file() {
    let (client, disk) = stub_disk().await;
    disk.folders.lock().unwrap().insert("disk:/bot".to_string());
    disk.files
        .lock()
        .unwrap()
        .insert("disk:/bot/notes.json".to_string(), b"old".to_vec());

    client.put("bot/notes.json", b"new".to_vec()).await.unwrap();

    assert_eq!(disk.file("disk:/bot/notes.json"), Some(b"new".to_vec()));
    assert_eq!(disk.folders.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn server_errors_carry_the_api_message() {
    let base = spawn(|_| {
        Router::new()
            .route(
                "/v1/disk/resources/download",
                get(|| async {
                    let body = json!({
                        "message": "Service is temporarily unavailable.",
                        "error": "DiskServiceUnavailableError",
                    });
                    (StatusCode::SERVICE_UNAVAILABLE, Json(body))
                }),
            )
            .route(
                "/v1/disk/resources/upload",
                get(|| async {
                    let body = json!({ "error": "InternalServerError" });
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
                }),
            )
    })
    .await;
    let client = client(TOKEN, &base);

    let err = client.get("bot/notes.json").await.unwrap_err();
    assert_eq!(server_error(err), (503, "Service is temporarily unavailable.".to_string()));

    let err = client.put("bot/notes.json", Vec::new()).await.unwrap_err();
    assert_eq!(server_error(err), (500, "InternalServerError".to_string()));
}

#[tokio::test]
async fn rejected_token_is_a_server_error() {
    let (_client, disk) = stub_disk().await;
    let client = client("wrong", &disk.base);

    let err = client.get("bot/notes.json").await.unwrap_err();
    assert_eq!(server_error(err), (401, "server error".to_string()));
}
