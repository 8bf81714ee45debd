//! Streaming chunk production for retrieval indexing
//!
//! This crate turns directories of page-level text records (JSON arrays of
//! `{"page_content", "metadata"}` objects) into per-file chunk outputs,
//! splitting each page into overlapping fixed-size windows.
//!
//! # Architecture
//!
//! - **Chunker** ([`chunker`]): pure sliding-window iterator over a `&str`
//! - **Page Stream Reader** ([`reader`]): decodes one page record at a time
//! - **Chunk Batch Writer** ([`writer`]): bounded batches, line-delimited or
//!   single-array output
//! - **File Orchestrator** ([`pipeline`]): wires the three together per file
//!
//! Memory use is bounded by the largest single page plus one batch of
//! serialised records, independent of how many pages a file holds.
//!
//! # Example
//!
//! ```rust,no_run
//! use pagechunk_core::{NoProgress, OutputEncoding, Pipeline, PipelineConfig};
//! use std::path::Path;
//!
//! let config = PipelineConfig::builder()
//!     .chunk_size(500)
//!     .overlap(50)
//!     .encoding(OutputEncoding::LineDelimited)
//!     .batch_size(100)
//!     .build()?;
//!
//! let pipeline = Pipeline::new(config)?;
//! let summary = pipeline.run(
//!     Path::new("data/interim/split"),
//!     Path::new("data/processed"),
//!     &mut NoProgress,
//! )?;
//! println!("wrote {} chunks", summary.total_chunks());
//! # Ok::<(), pagechunk_core::Error>(())
//! ```

pub mod chunker;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod reader;
pub mod record;
pub mod writer;

pub use chunker::{chunk, Chunker, Chunks, Window, Windows};
pub use config::{defaults, FailurePolicy, OutputEncoding, PipelineConfig, PipelineConfigBuilder};
pub use error::{Error, Result};
pub use pipeline::{
    chunk_pages, process, FileFailure, FileSummary, NoProgress, Pipeline, ProgressObserver,
    RunSummary,
};
pub use reader::{read_pages, PageStream};
pub use record::{ChunkRecord, Metadata, PageRecord};
pub use writer::{output_path, ChunkWriter, JsonArraySerializer};
