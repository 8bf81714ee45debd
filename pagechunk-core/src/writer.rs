//! Batched, incremental writing of chunk records
//!
//! A [`ChunkWriter`] owns one output file. In line-delimited mode records
//! are serialised into a bounded batch which is appended to the file each
//! time it fills up. In single-array mode records go straight through a
//! [`JsonArraySerializer`], which only closes the array in
//! [`ChunkWriter::finish`].

use crate::config::OutputEncoding;
use crate::error::{Error, Result};
use crate::record::ChunkRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the input stem to name the output file
pub const OUTPUT_SUFFIX: &str = "_chunks";

/// Output path for `input` inside `output_folder`
///
/// `pages.json` becomes `pages_chunks.jsonl` or `pages_chunks.json`.
pub fn output_path(output_folder: &Path, input: &Path, encoding: OutputEncoding) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    output_folder.join(format!("{stem}{OUTPUT_SUFFIX}.{}", encoding.extension()))
}

/// Streams values into a JSON array, one element at a time
///
/// The opening bracket is written on creation; separators are decided by
/// whether an element has been written yet.
#[derive(Debug)]
pub struct JsonArraySerializer<W: Write> {
    writer: W,
    first: bool,
}

impl<W: Write> JsonArraySerializer<W> {
    /// Start an array on `writer`
    pub fn new(mut writer: W) -> Result<Self> {
        writer.write_all(b"[")?;
        Ok(Self {
            writer,
            first: true,
        })
    }

    /// Append one element
    pub fn element<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let separator: &[u8] = if self.first { b"\n" } else { b",\n" };
        self.writer.write_all(separator)?;
        serde_json::to_writer(&mut self.writer, value)?;
        self.first = false;
        Ok(())
    }

    /// Close the array and return the writer
    pub fn end(mut self) -> Result<W> {
        let closing: &[u8] = if self.first { b"]\n" } else { b"\n]\n" };
        self.writer.write_all(closing)?;
        Ok(self.writer)
    }

    fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}

#[derive(Debug)]
enum Sink<W: Write> {
    Lines { writer: W, batch: Vec<String> },
    Array(JsonArraySerializer<W>),
}

/// Writes chunk records for one output file
#[derive(Debug)]
pub struct ChunkWriter<W: Write> {
    sink: Sink<W>,
    batch_size: usize,
    records_written: u64,
    batches_flushed: u64,
}

impl ChunkWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and write to it
    pub fn create(path: &Path, encoding: OutputEncoding, batch_size: usize) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), encoding, batch_size)
    }
}

impl<W: Write> ChunkWriter<W> {
    /// Write records to `writer` in the given encoding
    ///
    /// `batch_size` only affects line-delimited output.
    pub fn new(writer: W, encoding: OutputEncoding, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::Configuration(
                "batch_size must be greater than 0".into(),
            ));
        }

        let sink = match encoding {
            OutputEncoding::LineDelimited => Sink::Lines {
                writer,
                batch: Vec::with_capacity(batch_size),
            },
            OutputEncoding::SingleArray => Sink::Array(JsonArraySerializer::new(writer)?),
        };

        Ok(Self {
            sink,
            batch_size,
            records_written: 0,
            batches_flushed: 0,
        })
    }

    /// The encoding this writer produces
    pub fn encoding(&self) -> OutputEncoding {
        match self.sink {
            Sink::Lines { .. } => OutputEncoding::LineDelimited,
            Sink::Array(_) => OutputEncoding::SingleArray,
        }
    }

    /// Records accepted so far, flushed or not
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Batches appended to the output so far
    pub fn batches_flushed(&self) -> u64 {
        self.batches_flushed
    }

    /// Records waiting in the batch buffer
    pub fn pending(&self) -> usize {
        match &self.sink {
            Sink::Lines { batch, .. } => batch.len(),
            Sink::Array(_) => 0,
        }
    }

    /// Buffer one record, flushing when the batch is full
    pub fn write(&mut self, record: &ChunkRecord<'_>) -> Result<()> {
        match &mut self.sink {
            Sink::Lines { batch, .. } => {
                batch.push(serde_json::to_string(record)?);
                self.records_written += 1;
                if batch.len() >= self.batch_size {
                    self.flush()?;
                }
            }
            Sink::Array(array) => {
                array.element(record)?;
                self.records_written += 1;
            }
        }
        Ok(())
    }

    /// Append buffered records to the output
    pub fn flush(&mut self) -> Result<()> {
        match &mut self.sink {
            Sink::Lines { writer, batch } => {
                if batch.is_empty() {
                    return Ok(());
                }
                for line in batch.iter() {
                    writer.write_all(line.as_bytes())?;
                    writer.write_all(b"\n")?;
                }
                writer.flush()?;
                log::debug!("flushed batch of {} chunk records", batch.len());
                batch.clear();
                self.batches_flushed += 1;
            }
            Sink::Array(array) => array.get_mut().flush()?,
        }
        Ok(())
    }

    /// Flush the trailing batch, close the output and return the writer
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        let mut writer = match self.sink {
            Sink::Lines { writer, .. } => writer,
            Sink::Array(array) => array.end()?,
        };
        writer.flush()?;
        Ok(writer)
    }
}
