//! Page and chunk records
//!
//! A [`PageRecord`] is one page of extracted text plus its metadata. Each
//! chunk of its content becomes a [`ChunkRecord`] that borrows the page's
//! metadata unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Pass-through metadata mapping; key order is preserved
pub type Metadata = serde_json::Map<String, Value>;

/// Fallback when a page has no `source`
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Fallback when a page has no `page_number`
pub const UNKNOWN_PAGE_NUMBER: &str = "0";

/// One page of input text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// The page text; missing or null decodes as empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_content: String,
    /// Page metadata; missing or null decodes as an empty map
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PageRecord {
    /// Create a page record
    pub fn new(page_content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            page_content: page_content.into(),
            metadata,
        }
    }

    /// The page's `source`, or `"unknown"`
    pub fn source(&self) -> Cow<'_, str> {
        resolve_source(&self.metadata)
    }

    /// The page's `page_number`, or `"0"`
    pub fn page_number(&self) -> Cow<'_, str> {
        resolve_page_number(&self.metadata)
    }
}

/// One chunk of a page, as written to the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord<'a> {
    /// `{source}_page{page_number}_chunk{n}`
    pub chunk_id: String,
    /// The trimmed chunk text
    pub chunk_content: Cow<'a, str>,
    /// The originating page's metadata
    pub metadata: Cow<'a, Metadata>,
}

impl<'a> ChunkRecord<'a> {
    /// Wrap the `index`-th (1-based) chunk of `page`
    pub fn new(page: &'a PageRecord, index: usize, content: &'a str) -> Self {
        Self {
            chunk_id: chunk_id(&page.source(), &page.page_number(), index),
            chunk_content: Cow::Borrowed(content),
            metadata: Cow::Borrowed(&page.metadata),
        }
    }

    /// Detach the record from the page it borrows from
    pub fn into_owned(self) -> ChunkRecord<'static> {
        ChunkRecord {
            chunk_id: self.chunk_id,
            chunk_content: Cow::Owned(self.chunk_content.into_owned()),
            metadata: Cow::Owned(self.metadata.into_owned()),
        }
    }
}

/// Build a chunk id
pub fn chunk_id(source: &str, page_number: &str, index: usize) -> String {
    format!("{source}_page{page_number}_chunk{index}")
}

/// Resolve the `source` key, falling back to `"unknown"`
pub fn resolve_source(metadata: &Metadata) -> Cow<'_, str> {
    resolve_key(metadata, "source", UNKNOWN_SOURCE)
}

/// Resolve the `page_number` key, falling back to `"0"`
pub fn resolve_page_number(metadata: &Metadata) -> Cow<'_, str> {
    resolve_key(metadata, "page_number", UNKNOWN_PAGE_NUMBER)
}

fn resolve_key<'a>(metadata: &'a Metadata, key: &str, fallback: &'static str) -> Cow<'a, str> {
    match metadata.get(key) {
        None | Some(Value::Null) => Cow::Borrowed(fallback),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}
