//! Configuration module
//!
//! Settings are read from an optional TOML file. Command-line flags take
//! precedence over file values, which take precedence over built-in
//! defaults.

use crate::error::{CliError, CliResult};
use anyhow::Context;
use pagechunk_core::{defaults, FailurePolicy, OutputEncoding, PipelineConfig, PipelineConfigBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Input selection configuration
    #[serde(default)]
    pub input: InputConfig,

    /// Run behaviour configuration
    #[serde(default)]
    pub processing: ProcessingConfig,
}

/// Window parameters
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkingConfig {
    /// Window length in characters
    pub chunk_size: usize,

    /// Overlap between consecutive windows in characters
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: defaults::CHUNK_SIZE,
            overlap: defaults::OVERLAP,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// `line-delimited` or `single-array`
    pub encoding: OutputEncoding,

    /// Records per flush in line-delimited mode
    pub batch_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            encoding: defaults::ENCODING,
            batch_size: defaults::BATCH_SIZE,
        }
    }
}

/// Input selection configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Glob pattern for input files inside the input folder
    pub pattern: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            pattern: defaults::INPUT_PATTERN.to_string(),
        }
    }
}

/// Run behaviour configuration
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Keep going when an input file fails
    pub continue_on_error: bool,
}

impl CliConfig {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> CliResult<Self> {
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> CliResult<Self> {
        toml::from_str(content).map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    /// Serialise the configuration as TOML
    pub fn to_toml_string(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    /// Pipeline builder seeded with these settings
    pub fn pipeline_builder(&self) -> PipelineConfigBuilder {
        let failure_policy = if self.processing.continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        };

        PipelineConfig::builder()
            .chunk_size(self.chunking.chunk_size)
            .overlap(self.chunking.overlap)
            .encoding(self.output.encoding)
            .batch_size(self.output.batch_size)
            .input_pattern(self.input.pattern.clone())
            .failure_policy(failure_policy)
    }

    /// Validate by building the pipeline configuration
    pub fn validate(&self) -> CliResult<PipelineConfig> {
        self.pipeline_builder()
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()).into())
    }
}
