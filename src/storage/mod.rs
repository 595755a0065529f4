//! Storage module for persisting crawl progress and results
//!
//! This module handles:
//! - The checkpoint file naming the next listing page to crawl
//! - One CSV file of records per listing page
//! - Crash-safe replacement of both through temporary files

mod checkpoint;
mod csv_sink;
mod traits;

pub use checkpoint::FileCheckpoint;
pub use csv_sink::CsvSink;
pub use traits::{CheckpointStore, RecordSink, StorageError, StorageResult};

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replaces `path` with the bytes produced by `fill`
///
/// The content goes to a temporary file in the same directory, is flushed to
/// disk, and is then renamed over `path`, so readers observe either the old
/// file or the complete new one.
pub(crate) fn write_atomically<F>(path: &Path, fill: F) -> StorageResult<()>
where
    F: FnOnce(&mut NamedTempFile) -> StorageResult<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    fill(&mut tmp)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomically_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("value");

        write_atomically(&path, |f| Ok(f.write_all(b"first")?)).unwrap();
        write_atomically(&path, |f| Ok(f.write_all(b"second")?)).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_failed_fill_keeps_old_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("value");
        write_atomically(&path, |f| Ok(f.write_all(b"kept")?)).unwrap();

        let result = write_atomically(&path, |f| {
            f.write_all(b"partial")?;
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept");
        // The temporary file is removed when dropped
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
