//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the string-keyed local storage contract used by every store.
//! - Isolate SQLite query details from store and service code.
//!
//! # Invariants
//! - Keys are non-empty, trimmed identifiers.
//! - Values are opaque strings at this layer; JSON handling lives above it.

pub mod kv_repo;
