//! Session credentials for the Beacon client.
//!
//! This module provides:
//! - The credential store with expiry checks
//! - An in-memory storage backend
//! - Single-flight coordination of credential refreshes

mod memory_storage;
mod refresh;
mod token_store;

pub use memory_storage::MemoryCredentialStorage;
pub use refresh::{RefreshCoordinator, RefreshLease, RefreshOutcome, RefreshTicket, RefreshWaiter};
pub use token_store::{
    ACCESS_TOKEN_KEY, EXPIRY_LEEWAY_SECONDS, REFRESH_TOKEN_KEY, TokenStatus, TokenStore,
};
