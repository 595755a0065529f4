use crate::record::Record;
use crate::storage::{write_atomically, RecordSink, StorageResult};
use std::path::PathBuf;

/// Writes each page's records to `{dir}/{tag}.csv`
///
/// Files have no header row; columns follow the `Record` field order.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding the records of the page tagged `tag`
    pub fn file_path(&self, tag: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", tag))
    }
}

impl RecordSink for CsvSink {
    fn save(&mut self, records: &[Record], tag: &str) -> StorageResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.file_path(tag);

        write_atomically(&path, |file| {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
            Ok(())
        })?;

        tracing::info!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }
}
