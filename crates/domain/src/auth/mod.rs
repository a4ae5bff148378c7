//! Authentication domain types

mod claims;
mod types;

pub use claims::{Claims, ClaimsError, decode_claims};
pub use types::{
    LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest, TokenPair, bearer_header,
};
