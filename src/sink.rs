//! Delimited text sink for generated order rows.
//!
//! Initialization truncates the target and rewrites the header; everything
//! after that is a strict append through one exclusively-owned handle.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{OrderRecord, SINK_HEADER};

/// Row-oriented writer over any `Write` target.
pub struct RowWriter<W: Write> {
    writer: W,
}

impl<W: Write> RowWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        self.writer.write_all(SINK_HEADER.as_bytes())?;
        self.writer.write_all(b"\n")
    }

    /// Append one record as a single row. The row is materialized before
    /// any byte is written, so a failed append never leaves half a record.
    pub fn append(&mut self, record: &OrderRecord) -> io::Result<()> {
        let mut row = record.to_row();
        row.push('\n');
        self.writer.write_all(row.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// File-backed sink owned by the producer for the lifetime of a run.
pub struct FileSink {
    path: PathBuf,
    rows: RowWriter<BufWriter<File>>,
}

impl FileSink {
    /// Create or truncate the file at `path` and write the header row.
    pub fn create(path: &Path) -> Result<Self> {
        let init_err = |source| Error::SinkInit { path: path.to_path_buf(), source };

        let file = File::create(path).map_err(init_err)?;
        let mut rows = RowWriter::new(BufWriter::new(file));
        rows.write_header().map_err(init_err)?;
        rows.flush().map_err(init_err)?;

        Ok(Self { path: path.to_path_buf(), rows })
    }

    pub fn append(&mut self, record: &OrderRecord) -> Result<()> {
        self.rows.append(record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.rows.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current on-disk size in bytes. Call after `flush` for an exact figure.
    pub fn size_bytes(&self) -> u64 {
        std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }
}
