//! Query caching with stale times, invalidation and optimistic updates.

mod cache;
mod key;

pub use cache::{DEFAULT_GC_TIME, DEFAULT_STALE_TIME, QueryCache, Snapshot};
pub use key::QueryKey;
