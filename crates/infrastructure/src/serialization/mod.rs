//! Deterministic JSON serialization for files written by Beacon.
//!
//! Ensures stable output by:
//! - Sorting object keys alphabetically (via `BTreeMap` in source types)
//! - Using 2-space indentation
//! - Adding trailing newline

mod json;

pub use json::*;
