//! Process command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use pagechunk_core::{FailurePolicy, OutputEncoding, Pipeline, PipelineConfig};
use std::path::PathBuf;

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Folder containing JSON arrays of page records
    #[arg(short, long, value_name = "DIR", default_value = "data/interim/split")]
    pub input: PathBuf,

    /// Folder for the chunk files (created if absent)
    #[arg(short, long, value_name = "DIR", default_value = "data/processed")]
    pub output: PathBuf,

    /// Window length in characters [default: 500]
    #[arg(long, value_name = "CHARS")]
    pub chunk_size: Option<usize>,

    /// Overlap between consecutive windows in characters [default: 50]
    #[arg(long, value_name = "CHARS")]
    pub overlap: Option<usize>,

    /// Output format [default: jsonl]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Records written per flush in jsonl mode [default: 100]
    #[arg(long, value_name = "RECORDS")]
    pub batch_size: Option<usize>,

    /// Glob pattern selecting input files [default: *.json]
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip files that fail instead of aborting the run
    #[arg(long)]
    pub continue_on_error: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON record per line
    Jsonl,
    /// A single JSON array per file
    Json,
}

impl OutputFormat {
    /// Value accepted by `--format`
    pub fn flag(self) -> &'static str {
        match self {
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Json => "json",
        }
    }
}

impl From<OutputFormat> for OutputEncoding {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Jsonl => OutputEncoding::LineDelimited,
            OutputFormat::Json => OutputEncoding::SingleArray,
        }
    }
}

impl From<OutputEncoding> for OutputFormat {
    fn from(encoding: OutputEncoding) -> Self {
        match encoding {
            OutputEncoding::LineDelimited => OutputFormat::Jsonl,
            OutputEncoding::SingleArray => OutputFormat::Json,
        }
    }
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        // Initialize logging based on verbosity
        self.init_logging()?;

        log::info!("Starting chunking run");
        log::debug!("Arguments: {:?}", self);

        let config = self.pipeline_config()?;
        let pipeline = Pipeline::new(config)?;

        let mut reporter = ProgressReporter::new(self.quiet);
        let summary = pipeline
            .run(&self.input, &self.output, &mut reporter)
            .with_context(|| format!("Chunking run over {} failed", self.input.display()))?;
        reporter.finish();

        if !summary.is_empty() && !self.quiet {
            println!(
                "Done: {} files, {} pages, {} chunks written to {}",
                summary.files.len(),
                summary.total_pages(),
                summary.total_chunks(),
                self.output.display()
            );
        }

        if !summary.failed.is_empty() {
            for failure in &summary.failed {
                eprintln!("  skipped {}: {}", failure.input.display(), failure.error);
            }
            return Err(CliError::PartialFailure {
                failed: summary.failed.len(),
                total: summary.failed.len() + summary.files.len(),
            }
            .into());
        }

        Ok(())
    }

    /// Merge defaults, the config file and command-line flags
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let file_config = match &self.config {
            Some(path) => CliConfig::from_file(path)?,
            None => CliConfig::default(),
        };

        let mut builder = file_config.pipeline_builder();

        if let Some(size) = self.chunk_size {
            builder = builder.chunk_size(size);
        }
        if let Some(overlap) = self.overlap {
            builder = builder.overlap(overlap);
        }
        if let Some(format) = self.format {
            builder = builder.encoding(format.into());
        }
        if let Some(batch_size) = self.batch_size {
            builder = builder.batch_size(batch_size);
        }
        if let Some(pattern) = &self.pattern {
            builder = builder.input_pattern(pattern.clone());
        }
        if self.continue_on_error {
            builder = builder.failure_policy(FailurePolicy::Continue);
        }

        Ok(builder.build()?)
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // a logger may already be installed when run in-process
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }

        Ok(())
    }
}
