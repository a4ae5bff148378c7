//! Scripted backend and fixtures shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use beacon_application::ports::{
    Clock, CredentialStorage, HttpTransport, SignInRedirect, StorageError, TransportError,
};
use beacon_application::{ApiClient, ClientConfig, MemoryCredentialStorage, TokenStore};
use beacon_domain::{HttpMethod, HttpRequest, HttpResponse};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use tokio::sync::Semaphore;
use url::Url;

pub const BASE_URL: &str = "http://beacon.test/api/v1";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// A JWT-shaped token whose payload carries `exp = now + seconds`.
pub fn jwt_expiring_in(seconds: i64) -> String {
    let exp = now().timestamp() + seconds;
    format!(
        "e30.{}.sig",
        URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"sub":"user-1"}}"#))
    )
}

pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        now()
    }
}

/// How the backend answers `POST /auth/refresh`.
#[derive(Debug, Clone)]
pub enum RefreshBehavior {
    Issue { access: String, refresh: String },
    /// Accepts only `current`, then rotates to `access-N` / `refresh-N`.
    Rotate { current: String },
    Reject,
}

/// In-process backend: a route table plus bearer checking.
pub struct FakeBackend {
    valid_access: Mutex<String>,
    refresh: Mutex<RefreshBehavior>,
    routes: Mutex<HashMap<(HttpMethod, String), (u16, Value)>>,
    reject_everything: Mutex<bool>,
    refresh_gate: Semaphore,
    gated: bool,
    refresh_calls: AtomicUsize,
    log: Mutex<Vec<HttpRequest>>,
}

impl FakeBackend {
    pub fn new(valid_access: &str) -> Self {
        Self::build(valid_access, false)
    }

    /// Refresh calls block until [`FakeBackend::open_refresh_gate`].
    pub fn gated(valid_access: &str) -> Self {
        Self::build(valid_access, true)
    }

    fn build(valid_access: &str, gated: bool) -> Self {
        Self {
            valid_access: Mutex::new(valid_access.to_string()),
            refresh: Mutex::new(RefreshBehavior::Issue {
                access: "fresh-access".to_string(),
                refresh: "fresh-refresh".to_string(),
            }),
            routes: Mutex::new(HashMap::new()),
            reject_everything: Mutex::new(false),
            refresh_gate: Semaphore::new(0),
            gated,
            refresh_calls: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn route(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), (status, body));
    }

    pub fn set_refresh(&self, behavior: RefreshBehavior) {
        *self.refresh.lock().unwrap() = behavior;
    }

    /// Every non-refresh call answers 401, whatever the credential.
    pub fn reject_everything(&self) {
        *self.reject_everything.lock().unwrap() = true;
    }

    pub fn open_refresh_gate(&self) {
        self.refresh_gate.add_permits(1);
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|request| route_path(&request.url) == path)
            .collect()
    }

    async fn handle_refresh(&self, request: &HttpRequest) -> HttpResponse {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.gated {
            self.refresh_gate.acquire().await.unwrap().forget();
        }

        let body: Value = serde_json::from_slice(request.body.as_deref().unwrap_or_default())
            .unwrap_or(Value::Null);
        let behavior = self.refresh.lock().unwrap().clone();
        match behavior {
            RefreshBehavior::Issue { access, refresh } if body["refresh_token"].is_string() => {
                *self.valid_access.lock().unwrap() = access.clone();
                HttpResponse::json(
                    200,
                    &json!({
                        "data": {
                            "access_token": access,
                            "refresh_token": refresh,
                            "expires_in": 900
                        }
                    }),
                )
            }
            RefreshBehavior::Rotate { current } if body["refresh_token"] == current.as_str() => {
                let n = self.refresh_calls.load(Ordering::SeqCst);
                let (access, refresh) = (format!("access-{n}"), format!("refresh-{n}"));
                *self.refresh.lock().unwrap() = RefreshBehavior::Rotate {
                    current: refresh.clone(),
                };
                *self.valid_access.lock().unwrap() = access.clone();
                HttpResponse::json(
                    200,
                    &json!({
                        "data": {
                            "access_token": access,
                            "refresh_token": refresh,
                            "expires_in": 900
                        }
                    }),
                )
            }
            _ => unauthorized("invalid refresh token"),
        }
    }
}

#[async_trait]
impl HttpTransport for FakeBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.log.lock().unwrap().push(request.clone());
        let path = route_path(&request.url);

        if path == "/auth/refresh" {
            return Ok(self.handle_refresh(&request).await);
        }

        let route = self
            .routes
            .lock()
            .unwrap()
            .get(&(request.method, path.clone()))
            .cloned();
        let public = path.starts_with("/auth/");
        let authorized = !*self.reject_everything.lock().unwrap()
            && request.bearer_token() == Some(self.valid_access.lock().unwrap().as_str());

        Ok(match route {
            Some(_) if !public && !authorized => unauthorized("token expired"),
            Some((status, body)) => HttpResponse::json(status, &body),
            None => HttpResponse::json(404, &json!({"error": {"message": "not found"}})),
        })
    }
}

/// A transport that never answers.
pub struct Unreachable;

#[async_trait]
impl HttpTransport for Unreachable {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::ConnectionRefused {
            host: Url::parse(&request.url).unwrap().host_str().unwrap().to_string(),
            port: 80,
        })
    }
}

fn unauthorized(message: &str) -> HttpResponse {
    HttpResponse::json(401, &json!({"error": {"message": message}}))
}

fn route_path(url: &str) -> String {
    let url = Url::parse(url).unwrap();
    url.path().trim_start_matches("/api/v1").to_string()
}

/// Memory storage that counts how often credentials were wiped.
///
/// Reads can be slowed down, the value being taken before the pause, or
/// made to fail outright.
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryCredentialStorage,
    clears: AtomicUsize,
    slow_key: Mutex<Option<(String, Duration)>>,
    broken_reads: AtomicBool,
}

impl CountingStorage {
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Every read of `key` returns only after `delay`.
    pub fn slow_reads_of(&self, key: &str, delay: Duration) {
        *self.slow_key.lock().unwrap() = Some((key.to_string(), delay));
    }

    pub fn break_reads(&self) {
        self.broken_reads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStorage for CountingStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.broken_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "credential file locked",
            )));
        }
        let value = self.inner.get(key).await?;
        let delay = self
            .slow_key
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(slow, _)| slow == key)
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_many(keys).await
    }
}

#[derive(Default)]
pub struct RecordingRedirect {
    targets: Mutex<Vec<String>>,
}

impl RecordingRedirect {
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

impl SignInRedirect for RecordingRedirect {
    fn redirect(&self, entry_point: &str) {
        self.targets.lock().unwrap().push(entry_point.to_string());
    }
}

pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub storage: Arc<CountingStorage>,
    pub redirect: Arc<RecordingRedirect>,
    pub client: ApiClient,
}

impl Harness {
    pub fn new(backend: FakeBackend) -> Self {
        let backend = Arc::new(backend);
        let storage = Arc::new(CountingStorage::default());
        let redirect = Arc::new(RecordingRedirect::default());
        let tokens = TokenStore::new(storage.clone(), Arc::new(FixedClock));
        let config = ClientConfig::parse(BASE_URL)
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        let client = ApiClient::new(config, backend.clone(), tokens)
            .with_sign_in_redirect(redirect.clone());
        Self {
            backend,
            storage,
            redirect,
            client,
        }
    }

    pub async fn sign_in(&self, access: &str, refresh: &str) {
        self.client.tokens().set(access, refresh).await.unwrap();
    }

    /// Polls until `n` requests are queued behind the in-flight refresh.
    pub async fn wait_for_queue(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.client.refresh_coordinator().pending_len() < n {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("requests never queued behind the refresh");
    }
}

pub fn tracked_show(id: &str, favorite: bool) -> Value {
    json!({
        "show_id": id,
        "show_title": format!("Show {id}"),
        "poster_url": "",
        "is_favorite": favorite,
        "notify_new_episode": true,
        "notify_new_season": true,
        "notify_status_change": false,
        "notify_hours_before": 2,
        "status": "returning"
    })
}
