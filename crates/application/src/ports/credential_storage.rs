//! Credential storage port
//!
//! A durable key-value store for the access and refresh credentials.

use async_trait::async_trait;

/// Errors that can occur during credential storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Key-value persistence for credentials.
#[async_trait]
pub trait CredentialStorage: Send + Sync {
    /// Reads a value.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Writes several values.
    ///
    /// Stores that rewrite a whole file should override this to write once.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }

    /// Removes several values.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}
