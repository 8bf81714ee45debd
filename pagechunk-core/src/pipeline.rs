//! File orchestration: reader → chunker → writer, one file at a time

use crate::chunker::Chunker;
use crate::config::{FailurePolicy, OutputEncoding, PipelineConfig};
use crate::error::{Error, Result};
use crate::reader::PageStream;
use crate::record::{ChunkRecord, PageRecord};
use crate::writer::{output_path, ChunkWriter};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Outcome of one successfully processed input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    /// The input file
    pub input: PathBuf,
    /// The output file written for it
    pub output: PathBuf,
    /// Pages read
    pub pages: u64,
    /// Chunk records written
    pub chunks: u64,
}

/// An input file that failed under [`FailurePolicy::Continue`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// The input file
    pub input: PathBuf,
    /// Rendered error
    pub error: String,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files processed, in processing order
    pub files: Vec<FileSummary>,
    /// Files that failed and were skipped
    pub failed: Vec<FileFailure>,
}

impl RunSummary {
    /// Total pages read across all files
    pub fn total_pages(&self) -> u64 {
        self.files.iter().map(|f| f.pages).sum()
    }

    /// Total chunk records written across all files
    pub fn total_chunks(&self) -> u64 {
        self.files.iter().map(|f| f.chunks).sum()
    }

    /// Whether the run found nothing to process
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.failed.is_empty()
    }
}

/// Receives progress notifications; every hook defaults to a no-op
pub trait ProgressObserver {
    /// No eligible input file was found in `folder`
    fn no_files_found(&mut self, _folder: &Path) {}

    /// `total` eligible input files were found
    fn files_discovered(&mut self, _total: usize) {}

    /// Processing of `input` into `output` begins
    fn file_started(&mut self, _input: &Path, _output: &Path) {}

    /// One more page was chunked
    fn page_processed(&mut self, _pages: u64, _chunks: u64) {}

    /// `summary.input` was fully written
    fn file_completed(&mut self, _summary: &FileSummary) {}

    /// `input` failed with `error`
    fn file_failed(&mut self, _input: &Path, _error: &Error) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// The chunking pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    chunker: Chunker,
}

impl Pipeline {
    /// Create a pipeline, validating `config`
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let chunker = Chunker::new(config.chunk_size(), config.overlap())?;
        Ok(Self { config, chunker })
    }

    /// The configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Eligible input files in `folder`, sorted
    ///
    /// A missing folder yields no files.
    pub fn discover(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        if !folder.is_dir() {
            return Ok(Vec::new());
        }

        let escaped = glob::Pattern::escape(&folder.to_string_lossy());
        let pattern = Path::new(&escaped).join(self.config.input_pattern());
        let paths = glob::glob(&pattern.to_string_lossy())
            .map_err(|e| Error::Configuration(format!("invalid input pattern: {e}")))?;

        let mut files = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| Error::Io(e.into()))?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Fail if two inputs would write the same output file
    fn check_output_collisions(&self, files: &[PathBuf], output_folder: &Path) -> Result<()> {
        let mut outputs: HashMap<PathBuf, &Path> = HashMap::with_capacity(files.len());
        for input in files {
            let output = output_path(output_folder, input, self.config.encoding());
            if let Some(previous) = outputs.insert(output.clone(), input.as_path()) {
                return Err(Error::Configuration(format!(
                    "{} and {} would both be written to {}",
                    previous.display(),
                    input.display(),
                    output.display()
                )));
            }
        }
        Ok(())
    }

    /// Chunk every eligible file of `input_folder` into `output_folder`
    pub fn run(
        &self,
        input_folder: &Path,
        output_folder: &Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<RunSummary> {
        let files = self.discover(input_folder)?;
        let mut summary = RunSummary::default();

        if files.is_empty() {
            log::warn!("No JSON files found in {}", input_folder.display());
            observer.no_files_found(input_folder);
            return Ok(summary);
        }

        log::info!(
            "Chunking {} files from {} into {}",
            files.len(),
            input_folder.display(),
            output_folder.display()
        );
        log::debug!("Configuration: {:?}", self.config);

        self.check_output_collisions(&files, output_folder)?;
        fs::create_dir_all(output_folder)?;
        observer.files_discovered(files.len());

        for input in &files {
            match self.process_file(input, output_folder, observer) {
                Ok(file) => summary.files.push(file),
                Err(e) => {
                    observer.file_failed(input, &e);
                    match self.config.failure_policy() {
                        FailurePolicy::Abort => return Err(e),
                        FailurePolicy::Continue => {
                            log::warn!("Skipping {}: {e}", input.display());
                            summary.failed.push(FileFailure {
                                input: input.clone(),
                                error: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Chunk one input file into its output file inside `output_folder`
    pub fn process_file(
        &self,
        input: &Path,
        output_folder: &Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<FileSummary> {
        let output = output_path(output_folder, input, self.config.encoding());
        log::info!("Processing {} ...", input.display());
        observer.file_started(input, &output);

        let result = self.write_file(input, &output, observer);
        if let Err(e) = &result {
            if self.config.failure_policy() == FailurePolicy::Continue && output.exists() {
                if let Err(remove_err) = fs::remove_file(&output) {
                    log::warn!(
                        "Could not remove partial output {}: {remove_err}",
                        output.display()
                    );
                }
            }
            log::debug!("{} failed: {e}", input.display());
        }
        let (pages, chunks) = result.map_err(|e| e.in_file(input))?;

        let summary = FileSummary {
            input: input.to_path_buf(),
            output,
            pages,
            chunks,
        };
        log::info!(
            "Saved {} chunks from {} pages to {}",
            summary.chunks,
            summary.pages,
            summary.output.display()
        );
        observer.file_completed(&summary);
        Ok(summary)
    }

    fn write_file(
        &self,
        input: &Path,
        output: &Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<(u64, u64)> {
        let pages = PageStream::open(input)?;
        let mut writer = ChunkWriter::create(output, self.config.encoding(), self.config.batch_size())?;
        let counts = chunk_pages(pages, &self.chunker, &mut writer, observer)?;
        writer.finish()?;
        Ok(counts)
    }
}

/// Chunk a stream of pages into `writer`
///
/// Chunk indices restart at 1 for every page. Returns `(pages, chunks)`.
/// The writer is left open; call [`ChunkWriter::finish`] afterwards.
pub fn chunk_pages<I, W>(
    pages: I,
    chunker: &Chunker,
    writer: &mut ChunkWriter<W>,
    observer: &mut dyn ProgressObserver,
) -> Result<(u64, u64)>
where
    I: IntoIterator<Item = Result<PageRecord>>,
    W: Write,
{
    let mut page_count = 0;
    let mut chunk_count = 0;

    for page in pages {
        let page = page?;
        for (index, content) in chunker.chunks(&page.page_content).enumerate() {
            writer.write(&ChunkRecord::new(&page, index + 1, content))?;
            chunk_count += 1;
        }
        page_count += 1;
        observer.page_processed(page_count, chunk_count);
    }

    Ok((page_count, chunk_count))
}

/// Run the pipeline once with explicit parameters and no progress reporting
pub fn process(
    input_folder: &Path,
    output_folder: &Path,
    chunk_size: usize,
    overlap: usize,
    encoding: OutputEncoding,
    batch_size: usize,
) -> Result<RunSummary> {
    let config = PipelineConfig::builder()
        .chunk_size(chunk_size)
        .overlap(overlap)
        .encoding(encoding)
        .batch_size(batch_size)
        .build()?;
    Pipeline::new(config)?.run(input_folder, output_folder, &mut NoProgress)
}
