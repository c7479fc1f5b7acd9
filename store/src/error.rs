//! Error type shared by every storage backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness rule was violated, e.g. a second live session for a
    /// wallet that already has one.
    #[error("already exists: {0}")]
    Duplicate(String),

    /// A conditional update found the record in a different state than
    /// required, e.g. settling a session that is no longer mining.
    #[error("conditional update conflict: {0}")]
    Conflict(String),

    #[error("backend failure: {0}")]
    Backend(String),

    #[error("record encoding failed: {0}")]
    Serialization(String),

    #[error("store corrupted: {0}")]
    Corruption(String),
}
