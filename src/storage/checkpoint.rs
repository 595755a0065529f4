use crate::storage::{write_atomically, CheckpointStore, StorageResult};
use std::io::Write;
use std::path::PathBuf;

/// Checkpoint kept as a single-line text file
///
/// A missing file means no page has been completed yet.
#[derive(Debug, Clone)]
pub struct FileCheckpoint {
    path: PathBuf,
}

impl FileCheckpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CheckpointStore for FileCheckpoint {
    fn read(&self) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let url = content.trim();
                Ok((!url.is_empty()).then(|| url.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, next_page_url: &str) -> StorageResult<()> {
        write_atomically(&self.path, |file| {
            writeln!(file, "{}", next_page_url)?;
            Ok(())
        })?;
        tracing::debug!("Checkpoint advanced to {}", next_page_url);
        Ok(())
    }
}
