//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use pagechunk_core::{Error, FileSummary, ProgressObserver};
use std::path::Path;
use std::time::Duration;

/// Progress reporter for file processing
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    current_file: String,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            current_file: String::new(),
            quiet,
        }
    }

    /// Initialize progress bar for file processing
    pub fn init_files(&mut self, total_files: u64) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total_files);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Print a line without tearing the progress bar
    fn say(&self, message: &str) {
        if self.quiet {
            return;
        }
        match &self.progress_bar {
            Some(pb) => pb.suspend(|| println!("{message}")),
            None => println!("{message}"),
        }
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Complete");
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl ProgressObserver for ProgressReporter {
    fn no_files_found(&mut self, folder: &Path) {
        self.say(&format!("No JSON files found in {}", folder.display()));
    }

    fn files_discovered(&mut self, total: usize) {
        self.init_files(total as u64);
    }

    fn file_started(&mut self, input: &Path, _output: &Path) {
        self.current_file = file_name(input);
        self.say(&format!("Processing {} ...", self.current_file));
    }

    fn page_processed(&mut self, pages: u64, chunks: u64) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!(
                "{}: {pages} pages, {chunks} chunks",
                self.current_file
            ));
        }
    }

    fn file_completed(&mut self, summary: &FileSummary) {
        self.say(&format!(
            "Saved {} chunks from {} pages to {}",
            summary.chunks,
            summary.pages,
            summary.output.display()
        ));
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
        }
    }

    fn file_failed(&mut self, input: &Path, error: &Error) {
        let message = format!("Failed: {}: {error}", file_name(input));
        match &self.progress_bar {
            Some(pb) => pb.suspend(|| eprintln!("{message}")),
            None => eprintln!("{message}"),
        }
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_quiet_reporter_has_no_bar() {
        let mut reporter = ProgressReporter::new(true);
        reporter.files_discovered(3);
        assert!(reporter.progress_bar.is_none());
        reporter.file_started(Path::new("a.json"), Path::new("a_chunks.jsonl"));
        reporter.page_processed(1, 2);
        reporter.finish();
    }

    #[test]
    fn test_reporter_counts_completed_files() {
        let mut reporter = ProgressReporter::new(false);
        reporter.files_discovered(2);
        let summary = FileSummary {
            input: PathBuf::from("in/a.json"),
            output: PathBuf::from("out/a_chunks.jsonl"),
            pages: 4,
            chunks: 9,
        };
        reporter.file_started(&summary.input, &summary.output);
        assert_eq!(reporter.current_file, "a.json");
        reporter.file_completed(&summary);

        let pb = reporter.progress_bar.as_ref().unwrap();
        assert_eq!(pb.position(), 1);
        assert_eq!(pb.length(), Some(2));
        reporter.finish();
    }

    #[test]
    fn test_file_name_fallback() {
        assert_eq!(file_name(Path::new("/x/y/pages.json")), "pages.json");
        assert_eq!(file_name(Path::new("/")), "/");
    }
}
