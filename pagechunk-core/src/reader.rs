//! Incremental reading of page records from a JSON array
//!
//! [`PageStream`] walks the array punctuation itself and hands each element
//! to `serde_json`, so only the record being decoded is resident no matter
//! how many pages the file holds.

use crate::error::{Error, Result};
use crate::record::PageRecord;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    /// Before the opening bracket
    Start,
    /// After `[`, no element read yet
    First,
    /// After at least one element
    Rest,
    /// Closed, exhausted or failed
    Done,
}

/// Streaming iterator over the page records of one JSON array
pub struct PageStream<R> {
    reader: R,
    state: ArrayState,
    pages_read: u64,
}

impl PageStream<BufReader<File>> {
    /// Open `path` for streaming
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> PageStream<R> {
    /// Stream page records from `reader`
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: ArrayState::Start,
            pages_read: 0,
        }
    }

    /// Number of records yielded so far
    pub fn pages_read(&self) -> u64 {
        self.pages_read
    }

    /// Skip whitespace and return the next byte without consuming it
    fn peek_significant(&mut self) -> Result<Option<u8>> {
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(None);
            }
            let skipped = buf
                .iter()
                .take_while(|b| b.is_ascii_whitespace())
                .count();
            if skipped < buf.len() {
                let next = buf[skipped];
                self.reader.consume(skipped);
                return Ok(Some(next));
            }
            let len = buf.len();
            self.reader.consume(len);
        }
    }

    fn skip_bom(&mut self) -> Result<()> {
        let buf = self.reader.fill_buf()?;
        if buf.starts_with(UTF8_BOM) {
            self.reader.consume(UTF8_BOM.len());
        }
        Ok(())
    }

    fn open_array(&mut self) -> Result<()> {
        self.skip_bom()?;
        match self.peek_significant()? {
            Some(b'[') => {
                self.reader.consume(1);
                Ok(())
            }
            Some(_) => Err(Error::malformed("expected a JSON array of page records")),
            None => Err(Error::malformed("empty input, expected a JSON array")),
        }
    }

    fn close_array(&mut self) -> Result<()> {
        self.reader.consume(1);
        match self.peek_significant()? {
            None => Ok(()),
            Some(_) => Err(Error::malformed("trailing characters after the page array")),
        }
    }

    fn read_page(&mut self) -> Result<PageRecord> {
        let mut de = serde_json::Deserializer::from_reader(&mut self.reader);
        let page = PageRecord::deserialize(&mut de).map_err(|source| Error::Page {
            index: self.pages_read + 1,
            source,
        })?;
        self.pages_read += 1;
        Ok(page)
    }

    fn advance(&mut self) -> Result<Option<PageRecord>> {
        loop {
            match self.state {
                ArrayState::Done => return Ok(None),
                ArrayState::Start => {
                    self.open_array()?;
                    self.state = ArrayState::First;
                }
                ArrayState::First => {
                    return match self.peek_significant()? {
                        Some(b']') => {
                            self.state = ArrayState::Done;
                            self.close_array()?;
                            Ok(None)
                        }
                        Some(_) => {
                            let page = self.read_page()?;
                            self.state = ArrayState::Rest;
                            Ok(Some(page))
                        }
                        None => Err(Error::malformed("unexpected end of input inside the page array")),
                    };
                }
                ArrayState::Rest => {
                    return match self.peek_significant()? {
                        Some(b',') => {
                            self.reader.consume(1);
                            Ok(Some(self.read_page()?))
                        }
                        Some(b']') => {
                            self.state = ArrayState::Done;
                            self.close_array()?;
                            Ok(None)
                        }
                        Some(other) => Err(Error::malformed(format!(
                            "expected ',' or ']' after page {}, found '{}'",
                            self.pages_read,
                            char::from(other)
                        ))),
                        None => Err(Error::malformed("unexpected end of input inside the page array")),
                    };
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for PageStream<R> {
    type Item = Result<PageRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(page) => page.map(Ok),
            Err(e) => {
                self.state = ArrayState::Done;
                Some(Err(e))
            }
        }
    }
}

/// Stream the page records of the file at `path`
pub fn read_pages(path: &Path) -> Result<PageStream<BufReader<File>>> {
    PageStream::open(path)
}
