//! Validate command implementation

use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        match CliConfig::from_file(&self.config).and_then(|config| config.validate()) {
            Ok(pipeline) => {
                println!("✓ Configuration is valid!");
                println!("  Chunk size:    {} characters", pipeline.chunk_size());
                println!("  Overlap:       {} characters", pipeline.overlap());
                println!("  Encoding:      {}", pipeline.encoding());
                println!("  Batch size:    {} records", pipeline.batch_size());
                println!("  Input pattern: {}", pipeline.input_pattern());
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {:#}", e))
            }
        }
    }
}
