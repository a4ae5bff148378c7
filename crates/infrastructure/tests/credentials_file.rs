//! File credential storage behind the token store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use beacon_application::TokenStore;
use beacon_application::auth::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use beacon_application::ports::{CredentialStorage, StorageError};
use beacon_infrastructure::{FileCredentialStorage, SystemClock};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn pair_survives_a_new_store_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("credentials.json");

    let tokens = TokenStore::new(
        Arc::new(FileCredentialStorage::new(&path)),
        Arc::new(SystemClock::new()),
    );
    tokens.set("access-1", "refresh-1").await.unwrap();

    let reopened = FileCredentialStorage::new(&path);
    assert_eq!(
        reopened.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
        Some("access-1")
    );
    assert_eq!(
        reopened.get(REFRESH_TOKEN_KEY).await.unwrap().as_deref(),
        Some("refresh-1")
    );
}

#[tokio::test]
async fn file_holds_sorted_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileCredentialStorage::new(dir.path().join("credentials.json"));

    storage
        .set_many(&[(REFRESH_TOKEN_KEY, "r"), (ACCESS_TOKEN_KEY, "a")])
        .await
        .unwrap();

    let content = std::fs::read_to_string(storage.path()).unwrap();
    assert_eq!(
        content,
        "{\n  \"bb_access_token\": \"a\",\n  \"bb_refresh_token\": \"r\"\n}\n"
    );
}

#[tokio::test]
async fn clear_removes_only_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileCredentialStorage::new(dir.path().join("credentials.json")));
    storage.set("device_id", "d-1").await.unwrap();

    let tokens = TokenStore::new(Arc::clone(&storage) as _, Arc::new(SystemClock::new()));
    tokens.set("access", "refresh").await.unwrap();
    tokens.clear().await.unwrap();

    assert_eq!(tokens.get_access().await.unwrap(), None);
    assert_eq!(tokens.get_refresh().await.unwrap(), None);
    assert_eq!(storage.get("device_id").await.unwrap().as_deref(), Some("d-1"));
}

#[tokio::test]
async fn corrupt_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    std::fs::write(&path, "{ not json").unwrap();

    let storage = FileCredentialStorage::new(&path);
    let error = storage.get(ACCESS_TOKEN_KEY).await.unwrap_err();

    assert!(matches!(error, StorageError::Serialization(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn file_is_private_to_the_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let storage = FileCredentialStorage::new(dir.path().join("credentials.json"));
    storage.set(ACCESS_TOKEN_KEY, "a").await.unwrap();

    let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn readers_never_see_a_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileCredentialStorage::new(dir.path().join("credentials.json")));
    let large_access = "a".repeat(200 * 1024);
    storage
        .set_many(&[(ACCESS_TOKEN_KEY, "a"), (REFRESH_TOKEN_KEY, "r-0")])
        .await
        .unwrap();

    let writer = {
        let storage = Arc::clone(&storage);
        tokio::spawn(async move {
            for round in 0..50 {
                let refresh = format!("r-{round}");
                storage
                    .set_many(&[(ACCESS_TOKEN_KEY, &large_access), (REFRESH_TOKEN_KEY, &refresh)])
                    .await
                    .unwrap();
            }
        })
    };

    for _ in 0..500 {
        let refresh = storage.get(REFRESH_TOKEN_KEY).await.unwrap();
        assert!(refresh.is_some_and(|token| token.starts_with("r-")));
    }
    writer.await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn rewriting_a_world_readable_file_makes_it_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    std::fs::write(&path, "{}").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

    let storage = FileCredentialStorage::new(&path);
    storage.set(REFRESH_TOKEN_KEY, "r").await.unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
