//! pagechunk command-line entry point

use clap::Parser;
use pagechunk_cli::commands::Commands;

/// Split page-level text records into overlapping chunks for retrieval indexing
#[derive(Debug, Parser)]
#[command(name = "pagechunk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
