//! JSON file writer for capture records.
//!
//! Each [`CaptureRecord`] becomes one pretty-printed JSON document under the
//! root directory, named `{kind}_{timestamp}.json` (plus a numeric suffix on
//! collision). Bytes go to a hidden temp file in the same directory, are
//! synced, and are then moved into place with a no-clobber rename, so a
//! reader never sees a partial record and no record overwrites another.

use super::file_name::{names, next_free_suffix};
use capture_application::ports::record_writer::RecordWriter;
use capture_domain::{CaptureError, CaptureRecord};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

/// Directory re-syncs allowed for one record before giving up.
const MAX_RESYNCS: usize = 8;

/// File-per-record writer implementing the
/// [`RecordWriter`](capture_application::RecordWriter) port.
///
/// Thread-safe: only name allocation is serialized, writes run in parallel.
/// Name allocation is shared by every writer in the process.
pub struct JsonFileRecordWriter {
    root: PathBuf,
}

impl JsonFileRecordWriter {
    /// Create a writer rooted at `root`.
    ///
    /// Performs no I/O; the directory is created on each write if missing.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn stage(&self, bytes: &[u8]) -> Result<NamedTempFile, CaptureError> {
        std::fs::create_dir_all(&self.root).map_err(|e| CaptureError::io(&self.root, e))?;

        let mut temp = Builder::new()
            .prefix(".capture-")
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(|e| CaptureError::io(&self.root, e))?;

        let synced = temp
            .write_all(bytes)
            .and_then(|_| temp.as_file().sync_all());
        if let Err(e) = synced {
            return Err(CaptureError::io(temp.path(), e));
        }

        Ok(temp)
    }

    fn persist(&self, mut temp: NamedTempFile, stem: &str) -> Result<PathBuf, CaptureError> {
        let mut resyncs = 0;
        loop {
            let name = names().allocate(&self.root, stem);
            let path = self.root.join(name);

            match temp.persist_noclobber(&path) {
                Ok(_) => return Ok(path),
                Err(e)
                    if e.error.kind() == io::ErrorKind::AlreadyExists
                        && resyncs < MAX_RESYNCS =>
                {
                    // Left by an earlier process or under a forgotten stem
                    temp = e.file;
                    resyncs += 1;
                    self.resync(stem)?;
                }
                // Dropping `e.file` removes the temp file
                Err(e) => return Err(CaptureError::io(path, e.error)),
            }
        }
    }

    /// Advance the shared suffix for `stem` past every file already on disk.
    fn resync(&self, stem: &str) -> Result<(), CaptureError> {
        let file_names: Vec<String> = std::fs::read_dir(&self.root)
            .map_err(|e| CaptureError::io(&self.root, e))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();

        let next = next_free_suffix(stem, file_names.iter().map(String::as_str));
        debug!(
            "Name collision for {} under {}, resuming at suffix {}",
            stem,
            self.root.display(),
            next
        );
        names().resume_at(&self.root, stem, next);
        Ok(())
    }
}

impl RecordWriter for JsonFileRecordWriter {
    fn write(&self, record: &CaptureRecord) -> Result<PathBuf, CaptureError> {
        let mut bytes =
            serde_json::to_vec_pretty(record).map_err(|source| CaptureError::Serialize {
                kind: record.kind(),
                source,
            })?;
        bytes.push(b'\n');

        let temp = self.stage(&bytes)?;
        let path = self.persist(temp, &record.file_stem())?;
        debug!("Wrote {} record to {}", record.kind(), path.display());
        Ok(path)
    }
}
