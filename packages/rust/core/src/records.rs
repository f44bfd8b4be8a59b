//! Durable CSV record of successful syntheses.
//!
//! The file is truncated and the header written when the run starts; each
//! row is flushed as it is appended so everything on disk is a complete
//! row even if the run dies mid-loop.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::debug;

use devreach_shared::{ReachError, Result, RunRecord};

/// CSV header, matching the [`RunRecord`] field order.
const HEADER: [&str; 3] = ["name", "email", "email_content"];

/// Appends run records to the output CSV.
///
/// The underlying file is closed when the writer is dropped, on every exit
/// path.
#[derive(Debug)]
pub struct RecordWriter {
    writer: Writer<File>,
    path: PathBuf,
}

impl RecordWriter {
    /// Create (truncating) the output file and write the header.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| ReachError::io(path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer
            .write_record(HEADER)
            .and_then(|()| writer.flush().map_err(csv::Error::from))
            .map_err(|e| ReachError::Record(format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), "run-record file created");
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    /// Append one record and flush it to disk.
    pub fn append(&mut self, record: &RunRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .and_then(|()| self.writer.flush().map_err(csv::Error::from))
            .map_err(|e| ReachError::Record(format!("{}: {e}", self.path.display())))
    }

    /// Path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
