//! Persistence gateway contract shared by every entity repository.
//!
//! Repositories are narrow, synchronous traits defined next to the workflow
//! that consumes them; this module owns the common failure taxonomy and the
//! in-memory implementation that backs the binary and the test suites.

pub mod memory;

pub use memory::MemoryStore;

/// Infrastructure failures surfaced by a repository.
///
/// None of these are caller-recoverable: the HTTP layer maps `Conflict` to
/// 409 and everything else to 500. Missing rows are reported through
/// `Option`/empty results, not through this enum, so each workflow can attach
/// its own not-found message.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("failed to write record: {0}")]
    Write(String),
    #[error("table not configured: {0}")]
    TableMissing(String),
    #[error("store connection failed: {0}")]
    Connection(String),
}
