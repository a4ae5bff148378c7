//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod credential_storage;
mod http_transport;
mod sign_in;

pub use clock::Clock;
pub use credential_storage::{CredentialStorage, StorageError};
pub use http_transport::{HttpTransport, TransportError};
pub use sign_in::{SIGN_IN_PATH, SignInRedirect};
