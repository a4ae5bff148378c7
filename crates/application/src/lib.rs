//! Beacon Application - Client core
//!
//! This crate contains the authenticated API client, credential handling,
//! the query cache and the resource services. It depends only on the domain
//! crate; I/O goes through the ports in [`ports`].

pub mod auth;
pub mod client;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;

pub use auth::{MemoryCredentialStorage, RefreshCoordinator, TokenStatus, TokenStore};
pub use client::{ApiClient, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, REFRESH_PATH, unwrap};
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use query::{QueryCache, QueryKey, Snapshot};
pub use services::{BeaconServices, SessionState};
