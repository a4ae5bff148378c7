//! Beacon Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer, plus layered settings loading.

pub mod adapters;
pub mod persistence;
pub mod serialization;
pub mod settings;

pub use adapters::{DEFAULT_USER_AGENT, ReqwestHttpClient, SystemClock};
pub use persistence::FileCredentialStorage;
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
pub use settings::{Settings, SettingsError};
