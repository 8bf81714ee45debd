//! Configuration API for the chunking pipeline

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default configuration constants
pub mod defaults {
    use super::{FailurePolicy, OutputEncoding};

    /// Default window length in characters
    pub const CHUNK_SIZE: usize = 500;

    /// Default overlap between consecutive windows in characters
    pub const OVERLAP: usize = 50;

    /// Default number of buffered records per flush (line-delimited only)
    pub const BATCH_SIZE: usize = 100;

    /// Default glob pattern for eligible input files
    pub const INPUT_PATTERN: &str = "*.json";

    /// Default output encoding
    pub const ENCODING: OutputEncoding = OutputEncoding::LineDelimited;

    /// Default behaviour when an input file fails
    pub const FAILURE_POLICY: FailurePolicy = FailurePolicy::Abort;
}

/// Encoding of the per-file chunk output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputEncoding {
    /// One JSON record per line (`.jsonl`)
    #[serde(alias = "jsonl")]
    LineDelimited,
    /// A single JSON array holding every record of the file (`.json`)
    #[serde(alias = "json")]
    SingleArray,
}

impl OutputEncoding {
    /// All supported encodings
    pub const ALL: [OutputEncoding; 2] = [OutputEncoding::LineDelimited, OutputEncoding::SingleArray];

    /// File extension of outputs written in this encoding
    pub fn extension(self) -> &'static str {
        match self {
            OutputEncoding::LineDelimited => "jsonl",
            OutputEncoding::SingleArray => "json",
        }
    }

    /// Canonical configuration name
    pub fn name(self) -> &'static str {
        match self {
            OutputEncoding::LineDelimited => "line-delimited",
            OutputEncoding::SingleArray => "single-array",
        }
    }
}

impl Default for OutputEncoding {
    fn default() -> Self {
        defaults::ENCODING
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "line-delimited" | "jsonl" => Ok(OutputEncoding::LineDelimited),
            "single-array" | "json" => Ok(OutputEncoding::SingleArray),
            other => Err(Error::Configuration(format!(
                "unknown output encoding '{other}' (expected line-delimited or single-array)"
            ))),
        }
    }
}

/// What the orchestrator does when one input file fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the run at the first failing file
    #[default]
    Abort,
    /// Log the failure, discard that file's partial output and carry on
    Continue,
}

/// Pipeline-wide configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub(crate) chunk_size: usize,
    pub(crate) overlap: usize,
    pub(crate) encoding: OutputEncoding,
    pub(crate) batch_size: usize,
    pub(crate) input_pattern: String,
    pub(crate) failure_policy: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: defaults::CHUNK_SIZE,
            overlap: defaults::OVERLAP,
            encoding: defaults::ENCODING,
            batch_size: defaults::BATCH_SIZE,
            input_pattern: defaults::INPUT_PATTERN.to_string(),
            failure_policy: defaults::FAILURE_POLICY,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration builder
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Window length in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap between consecutive windows in characters
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Output encoding
    pub fn encoding(&self) -> OutputEncoding {
        self.encoding
    }

    /// Records buffered per flush in line-delimited mode
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Glob pattern selecting input files inside the input folder
    pub fn input_pattern(&self) -> &str {
        &self.input_pattern
    }

    /// Behaviour when an input file fails
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Error> {
        validate_window(self.chunk_size, self.overlap)?;

        if self.batch_size == 0 {
            return Err(Error::Configuration(
                "batch_size must be greater than 0".into(),
            ));
        }

        if self.input_pattern.trim().is_empty() {
            return Err(Error::Configuration(
                "input pattern must not be empty".into(),
            ));
        }

        glob::Pattern::new(&self.input_pattern).map_err(|e| {
            Error::Configuration(format!(
                "invalid input pattern '{}': {e}",
                self.input_pattern
            ))
        })?;

        Ok(())
    }
}

/// Check the window parameters shared by the chunker and the pipeline
pub(crate) fn validate_window(chunk_size: usize, overlap: usize) -> Result<(), Error> {
    if chunk_size <= overlap {
        return Err(Error::Configuration(format!(
            "chunk_size ({chunk_size}) must be greater than overlap ({overlap})"
        )));
    }
    Ok(())
}

/// Fluent builder for configuration
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    chunk_size: Option<usize>,
    overlap: Option<usize>,
    encoding: Option<OutputEncoding>,
    batch_size: Option<usize>,
    input_pattern: Option<String>,
    failure_policy: Option<FailurePolicy>,
}

impl PipelineConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window length in characters
    pub fn chunk_size(mut self, chars: usize) -> Self {
        self.chunk_size = Some(chars);
        self
    }

    /// Set the overlap between windows in characters
    pub fn overlap(mut self, chars: usize) -> Self {
        self.overlap = Some(chars);
        self
    }

    /// Set the output encoding
    pub fn encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Set the number of records per flush in line-delimited mode
    pub fn batch_size(mut self, records: usize) -> Self {
        self.batch_size = Some(records);
        self
    }

    /// Set the glob pattern used to select input files
    pub fn input_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.input_pattern = Some(pattern.into());
        self
    }

    /// Set the behaviour when an input file fails
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PipelineConfig, Error> {
        let mut config = PipelineConfig::default();

        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }

        if let Some(overlap) = self.overlap {
            config.overlap = overlap;
        }

        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }

        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }

        if let Some(pattern) = self.input_pattern {
            config.input_pattern = pattern;
        }

        if let Some(policy) = self.failure_policy {
            config.failure_policy = policy;
        }

        config.validate()?;
        Ok(config)
    }
}
