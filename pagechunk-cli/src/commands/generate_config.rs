//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use pagechunk_core::defaults;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite the file if it already exists
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, generate_template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the configuration file to adjust the chunking settings");
        println!("2. Validate your configuration:");
        println!("   pagechunk validate --config {}", self.output.display());
        println!("3. Use it for processing:");
        println!(
            "   pagechunk process -i data/interim/split -o data/processed --config {}",
            self.output.display()
        );

        Ok(())
    }
}

/// Template configuration content holding the built-in defaults
pub fn generate_template() -> String {
    format!(
        r#"# pagechunk configuration
#
# Command-line flags override the values in this file.

[chunking]
# Window length in characters
chunk_size = {chunk_size}
# Characters shared by consecutive windows (must be less than chunk_size)
overlap = {overlap}

[output]
# "line-delimited" (one record per line, .jsonl) or "single-array" (.json)
encoding = "{encoding}"
# Records buffered per flush in line-delimited mode
batch_size = {batch_size}

[input]
# Glob pattern selecting input files inside the input folder
pattern = "{pattern}"

[processing]
# Skip files that fail instead of aborting the run
continue_on_error = false
"#,
        chunk_size = defaults::CHUNK_SIZE,
        overlap = defaults::OVERLAP,
        encoding = defaults::ENCODING,
        batch_size = defaults::BATCH_SIZE,
        pattern = defaults::INPUT_PATTERN,
    )
}
