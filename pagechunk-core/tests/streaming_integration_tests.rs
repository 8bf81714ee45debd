//! Integration tests for incremental page reading and chunk writing

use pagechunk_core::{
    chunk_pages, ChunkWriter, Chunker, NoProgress, OutputEncoding, PageStream, ProgressObserver,
};
use std::io::{self, BufReader, Read};

/// Mock reader that provides data in small chunks
struct ChunkedReader {
    data: Vec<u8>,
    position: usize,
    chunk_size: usize,
    max_read: usize,
}

impl ChunkedReader {
    fn new(data: &str, chunk_size: usize) -> Self {
        Self {
            data: data.as_bytes().to_vec(),
            position: 0,
            chunk_size,
            max_read: 0,
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.position >= self.data.len() {
            return Ok(0);
        }

        let remaining = self.data.len() - self.position;
        let to_read = remaining.min(self.chunk_size).min(buf.len());

        buf[..to_read].copy_from_slice(&self.data[self.position..self.position + to_read]);
        self.position += to_read;
        self.max_read = self.max_read.max(self.position);

        Ok(to_read)
    }
}

fn generate_pages(count: usize) -> String {
    let pages: Vec<String> = (1..=count)
        .map(|n| {
            format!(
                r#"{{"page_content": "Page {n} talks about markets. Prices move daily.", "metadata": {{"source": "big.pdf", "page_number": {n}}}}}"#
            )
        })
        .collect();
    format!("[\n{}\n]", pages.join(",\n"))
}

#[test]
fn test_reader_with_tiny_reads() {
    let input = generate_pages(25);
    let reader = BufReader::with_capacity(4, ChunkedReader::new(&input, 3));
    let pages: Vec<_> = PageStream::new(reader).map(|p| p.unwrap()).collect();

    assert_eq!(pages.len(), 25);
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.page_number(), (i + 1).to_string());
        assert!(page.page_content.starts_with(&format!("Page {} ", i + 1)));
    }
}

#[test]
fn test_first_page_available_before_input_is_consumed() {
    let input = generate_pages(1000);
    let total = input.len();
    let mut reader = BufReader::with_capacity(64, ChunkedReader::new(&input, 64));

    let mut stream = PageStream::new(&mut reader);
    let first = stream.next().unwrap().unwrap();
    assert_eq!(first.page_number(), "1");
    assert_eq!(stream.pages_read(), 1);
    drop(stream);

    // one element plus one buffer of read-ahead
    let consumed = reader.get_ref().max_read;
    assert!(consumed < total / 100, "consumed {consumed} of {total} bytes");
}

#[derive(Default)]
struct PageCounter {
    last: (u64, u64),
    calls: usize,
}

impl ProgressObserver for PageCounter {
    fn page_processed(&mut self, pages: u64, chunks: u64) {
        self.last = (pages, chunks);
        self.calls += 1;
    }
}

#[test]
fn test_many_pages_through_small_batches() {
    let input = generate_pages(500);
    let pages = PageStream::new(BufReader::new(ChunkedReader::new(&input, 17)));
    let chunker = Chunker::new(20, 5).unwrap();
    let mut writer = ChunkWriter::new(Vec::new(), OutputEncoding::LineDelimited, 7).unwrap();
    let mut counter = PageCounter::default();

    let (page_count, chunk_count) = chunk_pages(pages, &chunker, &mut writer, &mut counter).unwrap();
    assert_eq!(page_count, 500);
    assert_eq!(counter.calls, 500);
    assert_eq!(counter.last, (page_count, chunk_count));
    assert!(writer.pending() < 7);

    let output = String::from_utf8(writer.finish().unwrap()).unwrap();
    assert_eq!(output.lines().count() as u64, chunk_count);
    assert!(output.lines().last().unwrap().contains("big.pdf_page500_chunk"));
}

#[test]
fn test_malformed_tail_after_streamed_pages() {
    let mut input = generate_pages(3);
    input.truncate(input.len() - 1); // drop the closing bracket
    let pages = PageStream::new(BufReader::new(ChunkedReader::new(&input, 8)));
    let chunker = Chunker::new(500, 50).unwrap();
    let mut writer = ChunkWriter::new(Vec::new(), OutputEncoding::SingleArray, 1).unwrap();

    let result = chunk_pages(pages, &chunker, &mut writer, &mut NoProgress);
    assert!(result.is_err());
    assert_eq!(writer.records_written(), 3);
}
