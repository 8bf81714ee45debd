//! Sliding-window chunking of page text
//!
//! Windows are `chunk_size` characters long and start every
//! `chunk_size - overlap` characters, so consecutive windows share
//! `overlap` characters. Offsets count Unicode scalar values, never bytes,
//! which keeps every window on a character boundary.
//!
//! ```rust
//! use pagechunk_core::chunker::chunk;
//!
//! let text = "a".repeat(1200);
//! let chunks: Vec<&str> = chunk(&text, 500, 50).unwrap().collect();
//! assert_eq!(chunks.len(), 3);
//! assert_eq!(chunks[2].len(), 300);
//! ```

use crate::config::validate_window;
use crate::error::Result;

/// Validated window parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker, failing if `chunk_size <= overlap`
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        validate_window(chunk_size, overlap)?;
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Window length in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Characters shared by consecutive windows
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between consecutive window starts, always at least 1
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Raw, untrimmed windows over `text`
    pub fn windows<'a>(&self, text: &'a str) -> Windows<'a> {
        Windows {
            text,
            start_byte: 0,
            start_char: 0,
            chunk_size: self.chunk_size,
            step: self.step(),
        }
    }

    /// Trimmed, non-empty chunks over `text`
    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks {
            windows: self.windows(text),
        }
    }
}

/// Chunk `text` in one call
///
/// Invalid parameters fail here, before any chunk is produced.
pub fn chunk(text: &str, chunk_size: usize, overlap: usize) -> Result<Chunks<'_>> {
    Ok(Chunker::new(chunk_size, overlap)?.chunks(text))
}

/// One window of the input, before trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window<'a> {
    /// Character offset of the first character
    pub start: usize,
    /// Character offset one past the last character
    pub end: usize,
    /// The window's text
    pub text: &'a str,
}

/// Iterator over the raw windows of a text
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    text: &'a str,
    start_byte: usize,
    start_char: usize,
    chunk_size: usize,
    step: usize,
}

/// Byte length of the first `n` characters of `s`, or all of `s` if shorter
fn prefix_len(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

impl<'a> Iterator for Windows<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start_byte >= self.text.len() {
            return None;
        }

        let rest = &self.text[self.start_byte..];
        let len = prefix_len(rest, self.chunk_size);
        let text = &rest[..len];
        let chars = if len < rest.len() {
            self.chunk_size
        } else {
            text.chars().count()
        };

        let window = Window {
            start: self.start_char,
            end: self.start_char + chars,
            text,
        };

        self.start_byte += prefix_len(rest, self.step);
        self.start_char += self.step;

        Some(window)
    }
}

impl std::iter::FusedIterator for Windows<'_> {}

/// Iterator over trimmed, non-empty chunks
///
/// Windows that are empty after trimming are skipped and do not consume a
/// chunk index downstream.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    windows: Windows<'a>,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.windows
            .by_ref()
            .map(|window| window.text.trim())
            .find(|chunk| !chunk.is_empty())
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}
