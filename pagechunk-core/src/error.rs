//! Error types for the chunking pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Error type for pipeline operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid pipeline parameters, detected before any file is touched
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The input is not a well-formed JSON array of page records
    #[error("Malformed input{}: {message}", display_path(.path))]
    MalformedInput {
        /// Input file, when known
        path: Option<PathBuf>,
        /// What went wrong
        message: String,
    },

    /// A page record of the array could not be decoded
    #[error("Invalid page record {index}: {source}")]
    Page {
        /// 1-based position of the record in the array
        index: u64,
        /// Decoder error, positioned relative to the record
        #[source]
        source: serde_json::Error,
    },

    /// Encoding a chunk record failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading, writing or creating files and directories
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A failure while processing one input file
    #[error("Failed to process {}: {source}", .path.display())]
    File {
        /// The input file being processed
        path: PathBuf,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" in {}", path.display()),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput {
            path: None,
            message: message.into(),
        }
    }

    /// Attach the input file this error occurred in
    ///
    /// Malformed input records the path itself; everything else is wrapped
    /// in [`Error::File`].
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            err @ Error::File { .. } => err,
            Error::MalformedInput { path: None, message } => Error::MalformedInput {
                path: Some(path.into()),
                message,
            },
            err @ Error::MalformedInput { .. } => err,
            err => Error::File {
                path: path.into(),
                source: Box::new(err),
            },
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
