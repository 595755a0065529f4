//! Storage traits and error types
//!
//! This module defines the two persistence seams of a crawl: the checkpoint
//! recording where to resume, and the sink receiving each page's records.

use crate::record::Record;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to move temporary file into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable single-value store holding the next listing page to crawl
///
/// There is exactly one reader and one writer per process, the coordinator,
/// so implementations need no locking.
pub trait CheckpointStore {
    /// Returns the saved next-page URL, or `None` before the first
    /// completed page
    fn read(&self) -> StorageResult<Option<String>>;

    /// Replaces the saved value
    ///
    /// A crash during the write must leave either the old or the new value,
    /// never a partial one.
    fn write(&mut self, next_page_url: &str) -> StorageResult<()>;
}

/// Destination for the records of one listing page
pub trait RecordSink {
    /// Writes a page's batch, replacing anything previously saved under
    /// the same tag
    ///
    /// An empty batch still produces an (empty) output, marking the page as
    /// processed.
    fn save(&mut self, records: &[Record], tag: &str) -> StorageResult<()>;
}
