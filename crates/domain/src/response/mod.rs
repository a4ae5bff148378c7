//! Response types

mod spec;

pub use spec::{HttpResponse, StatusCode};
