//! File-based credential storage.
//!
//! Credentials live in a single JSON object in the platform config
//! directory:
//! - Linux: ~/.config/beacon/credentials.json
//! - macOS: ~/Library/Application Support/beacon/credentials.json
//! - Windows: %APPDATA%/beacon/credentials.json

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use beacon_application::ports::{CredentialStorage, StorageError};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

type Entries = BTreeMap<String, String>;

/// Credential storage backed by a JSON file.
///
/// Writes within one process are serialized and land through a rename, so
/// reads need no lock. There is no cross-process locking.
#[derive(Debug)]
pub struct FileCredentialStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStorage {
    /// Creates a store at a specific path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Default location, `<config dir>/beacon/credentials.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("beacon").join("credentials.json"))
    }

    /// The file backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StorageError> {
        match fs::read(&self.path).await {
            Ok(content) if content.iter().all(u8::is_ascii_whitespace) => Ok(Entries::new()),
            Ok(content) => {
                from_json_bytes(&content).map_err(|e| StorageError::Serialization(e.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the file in one step so readers see either the old or the
    /// new content, never a partial write.
    async fn save(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = to_json_stable_bytes(entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let tmp = self.temp_path();
        if let Err(e) = fs::remove_file(&tmp).await
            && e.kind() != ErrorKind::NotFound
        {
            return Err(e.into());
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&tmp).await?;
        file.write_all(&content).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to replace credential file");
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Sibling temp file, unique per process.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "credentials".into(), |name| name.to_string_lossy());
        self.path
            .with_file_name(format!("{name}.{}.tmp", std::process::id()))
    }

    async fn update<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Entries) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        change(&mut entries);
        self.save(&entries).await
    }
}

#[async_trait]
impl CredentialStorage for FileCredentialStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_many(&[(key, value)]).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_many(&[key]).await
    }

    async fn set_many(&self, pairs: &[(&str, &str)]) -> Result<(), StorageError> {
        self.update(|entries| {
            for (key, value) in pairs {
                entries.insert((*key).to_string(), (*value).to_string());
            }
        })
        .await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();
        entries.retain(|key, _| !keys.contains(&key.as_str()));
        if entries.len() == before {
            return Ok(());
        }
        self.save(&entries).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_path_ends_in_beacon_dir() {
        if let Some(path) = FileCredentialStorage::default_path() {
            assert!(path.ends_with("beacon/credentials.json"));
        }
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCredentialStorage::new(dir.path().join("nope.json"));

        assert_eq!(storage.get("bb_access_token").await.unwrap(), None);
        storage.remove("bb_access_token").await.unwrap();
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCredentialStorage::new(dir.path().join("credentials.json"));
        std::fs::write(storage.temp_path(), "stale").unwrap();

        storage.set("bb_access_token", "a").await.unwrap();
        storage.set("bb_access_token", "b").await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("credentials.json")]);
        assert_eq!(storage.get("bb_access_token").await.unwrap().as_deref(), Some("b"));
    }
}
