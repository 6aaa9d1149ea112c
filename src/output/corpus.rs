//! Line-delimited JSON corpus writer
//!
//! One [`Record`] per line, appended in call order. The file is truncated on
//! open: a corpus run rebuilds its output from scratch, and resumable append
//! is deliberately not offered. Write and flush failures are fatal to the
//! run; silent data loss is worse than an aborted harvest.

use crate::pipeline::Record;
use crate::HarvestError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only writer for the corpus file
///
/// Dropping the writer flushes best-effort via `BufWriter`; call
/// [`CorpusWriter::finish`] to observe flush errors.
pub struct CorpusWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl CorpusWriter {
    /// Creates (or truncates) the corpus file at `path`
    pub fn create(path: &Path) -> Result<Self, HarvestError> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Serializes one record as a JSON line and appends it
    ///
    /// Records are never rewritten or removed; call order is file order.
    pub fn append(&mut self, record: &Record) -> Result<(), HarvestError> {
        let line = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", line)?;
        self.written += 1;
        Ok(())
    }

    /// Number of records appended so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path of the corpus file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes and closes the writer, returning the final record count
    pub fn finish(mut self) -> Result<u64, HarvestError> {
        self.writer.flush()?;
        Ok(self.written)
    }
}
