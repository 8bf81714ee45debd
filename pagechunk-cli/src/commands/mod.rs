//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;
use pagechunk_core::OutputEncoding;

pub mod generate_config;
pub mod process;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Chunk every page-record file in a folder
    Process(process::ProcessArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },

    /// Validate a configuration file
    Validate(validate::ValidateArgs),

    /// Write a configuration file with the default settings
    GenerateConfig(generate_config::GenerateConfigArgs),
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List available output formats
    Formats,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Process(args) => args.execute(),
            Commands::List { subcommand } => {
                subcommand.execute();
                Ok(())
            }
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }
}

impl ListCommands {
    fn execute(&self) {
        match self {
            ListCommands::Formats => {
                println!("Available output formats:");
                for encoding in OutputEncoding::ALL {
                    println!(
                        "  {:<6} {:<16} {}",
                        process::OutputFormat::from(encoding).flag(),
                        encoding.name(),
                        describe(encoding)
                    );
                }
            }
        }
    }
}

fn describe(encoding: OutputEncoding) -> &'static str {
    match encoding {
        OutputEncoding::LineDelimited => "one JSON chunk record per line (*_chunks.jsonl)",
        OutputEncoding::SingleArray => "one JSON array of chunk records (*_chunks.json)",
    }
}
