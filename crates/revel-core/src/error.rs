//! Error types for revel-core.
//!
//! The engagement state machines are total over their documented domains
//! and never fail; fallibility is confined to the persistence boundary.

use thiserror::Error;

/// Errors surfaced by a [`PersistenceGateway`](crate::storage::PersistenceGateway)
/// implementation. The engine treats these as best-effort failures: the
/// in-memory mutation that triggered the write stands regardless.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to (de)serialize a blob value
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store rejected or failed the operation
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type alias for storage operations
pub type Result<T, E = StorageError> = std::result::Result<T, E>;
