//! Chunk a folder of page-record files with the library API

use pagechunk_core::{
    chunk, FileSummary, OutputEncoding, Pipeline, PipelineConfig, ProgressObserver,
};
use std::env;
use std::path::{Path, PathBuf};

struct PrintProgress;

impl ProgressObserver for PrintProgress {
    fn no_files_found(&mut self, folder: &Path) {
        println!("No JSON files found in {}", folder.display());
    }

    fn file_started(&mut self, input: &Path, _output: &Path) {
        println!("Processing {} ...", input.display());
    }

    fn file_completed(&mut self, summary: &FileSummary) {
        println!(
            "Saved {} chunks ({} pages) to {}",
            summary.chunks,
            summary.pages,
            summary.output.display()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example 1: chunk a single string
    println!("=== Example 1: One Text ===");
    let text = "Mutual funds pool money from many investors. ".repeat(20);
    for (i, piece) in chunk(&text, 200, 40)?.enumerate() {
        println!("  chunk {}: {} chars", i + 1, piece.chars().count());
    }

    // Example 2: chunk every file in a folder
    println!("\n=== Example 2: Folder ===");
    let mut args = env::args().skip(1);
    let input = args.next().map_or_else(|| PathBuf::from("data/interim/split"), PathBuf::from);
    let output = args.next().map_or_else(|| PathBuf::from("data/processed"), PathBuf::from);

    let config = PipelineConfig::builder()
        .chunk_size(500)
        .overlap(50)
        .encoding(OutputEncoding::LineDelimited)
        .batch_size(100)
        .build()?;
    let summary = Pipeline::new(config)?.run(&input, &output, &mut PrintProgress)?;
    println!(
        "{} files, {} pages, {} chunks",
        summary.files.len(),
        summary.total_pages(),
        summary.total_chunks()
    );

    Ok(())
}
