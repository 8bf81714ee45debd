//! End-to-end tests for the file orchestrator

use pagechunk_core::{
    process, ChunkRecord, FailurePolicy, NoProgress, OutputEncoding, Pipeline, PipelineConfig,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_pages(dir: &Path, name: &str, pages: &Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(pages).unwrap()).unwrap();
}

fn read_jsonl(path: &Path) -> Vec<ChunkRecord<'static>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_reference_scenario_three_chunks() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("split");
    let output = dir.path().join("processed");
    fs::create_dir(&input).unwrap();

    let content: String = (0..1200).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    write_pages(
        &input,
        "varsity_part1.json",
        &json!([{
            "page_content": content,
            "metadata": {"source": "module1.pdf", "page_number": 7, "category": "varsity"}
        }]),
    );

    let summary = process(&input, &output, 500, 50, OutputEncoding::LineDelimited, 100).unwrap();
    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.total_pages(), 1);
    assert_eq!(summary.total_chunks(), 3);

    let records = read_jsonl(&output.join("varsity_part1_chunks.jsonl"));
    let ids: Vec<_> = records.iter().map(|r| r.chunk_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "module1.pdf_page7_chunk1",
            "module1.pdf_page7_chunk2",
            "module1.pdf_page7_chunk3"
        ]
    );
    assert_eq!(records[0].chunk_content, &content[0..500]);
    assert_eq!(records[1].chunk_content, &content[450..950]);
    assert_eq!(records[2].chunk_content, &content[900..1200]);
    assert_eq!(records[2].metadata["category"], json!("varsity"));
}

#[test]
fn test_empty_page_content_emits_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    write_pages(
        dir.path(),
        "pages.json",
        &json!([
            {"page_content": "", "metadata": {"source": "a", "page_number": 1}},
            {"metadata": {"source": "a", "page_number": 2}},
            {"page_content": "text", "metadata": {"source": "a", "page_number": 3}}
        ]),
    );

    let summary = process(dir.path(), &output, 10, 2, OutputEncoding::LineDelimited, 1).unwrap();
    assert_eq!(summary.total_pages(), 3);

    let records = read_jsonl(&output.join("pages_chunks.jsonl"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].chunk_id, "a_page3_chunk1");
}

#[test]
fn test_empty_input_directory() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");

    let summary = process(dir.path(), &output, 500, 50, OutputEncoding::LineDelimited, 100).unwrap();
    assert!(summary.is_empty());
    assert!(!output.exists());
}

#[test]
fn test_missing_input_directory() {
    let dir = TempDir::new().unwrap();
    let summary = process(
        &dir.path().join("does-not-exist"),
        &dir.path().join("out"),
        500,
        50,
        OutputEncoding::SingleArray,
        100,
    )
    .unwrap();
    assert!(summary.is_empty());
}

#[test]
fn test_single_array_round_trip() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    write_pages(
        dir.path(),
        "doc.json",
        &json!([
            {"page_content": "alpha beta gamma delta", "metadata": {"source": "d", "page_number": 1}},
            {"page_content": "epsilon zeta", "metadata": {"source": "d", "page_number": 2}}
        ]),
    );

    process(dir.path(), &output, 8, 2, OutputEncoding::SingleArray, 1).unwrap();

    let text = fs::read_to_string(output.join("doc_chunks.json")).unwrap();
    let records: Vec<ChunkRecord<'static>> = serde_json::from_str(&text).unwrap();
    let contents: Vec<_> = records.iter().map(|r| &*r.chunk_content).collect();
    assert_eq!(
        contents,
        vec!["alpha be", "beta gam", "amma del", "elta", "epsilon", "n zeta"]
    );
    assert_eq!(records[3].chunk_id, "d_page1_chunk4");
    assert_eq!(records[4].chunk_id, "d_page2_chunk1");
}

#[test]
fn test_line_delimited_matches_single_array() {
    let dir = TempDir::new().unwrap();
    let pages = json!([
        {"page_content": "x".repeat(95), "metadata": {"source": "s", "page_number": 1, "extra": 1.5}},
        {"page_content": "y".repeat(40), "metadata": {"source": "s", "page_number": 2}}
    ]);
    write_pages(dir.path(), "p.json", &pages);

    let jsonl_out = dir.path().join("jsonl");
    let json_out = dir.path().join("json");
    process(dir.path(), &jsonl_out, 20, 5, OutputEncoding::LineDelimited, 3).unwrap();
    process(dir.path(), &json_out, 20, 5, OutputEncoding::SingleArray, 3).unwrap();

    let from_lines = read_jsonl(&jsonl_out.join("p_chunks.jsonl"));
    let from_array: Vec<ChunkRecord<'static>> =
        serde_json::from_str(&fs::read_to_string(json_out.join("p_chunks.json")).unwrap()).unwrap();
    assert_eq!(from_lines, from_array);
    assert_eq!(from_lines.len(), 10);
}

#[test]
fn test_files_processed_in_sorted_order() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    for name in ["c.json", "a.json", "b.json"] {
        write_pages(dir.path(), name, &json!([{"page_content": name}]));
    }

    let summary = process(dir.path(), &output, 50, 0, OutputEncoding::LineDelimited, 10).unwrap();
    let outputs: Vec<_> = summary
        .files
        .iter()
        .map(|f| f.output.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        outputs,
        vec!["a_chunks.jsonl", "b_chunks.jsonl", "c_chunks.jsonl"]
    );
}

#[test]
fn test_malformed_file_aborts_by_default() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    fs::write(dir.path().join("a.json"), "{not an array}").unwrap();
    write_pages(dir.path(), "b.json", &json!([{"page_content": "never reached"}]));

    let result = process(dir.path(), &output, 50, 0, OutputEncoding::LineDelimited, 10);
    assert!(result.is_err());
    assert!(!output.join("b_chunks.jsonl").exists());
}

#[test]
fn test_continue_policy_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    fs::write(dir.path().join("a.json"), "{not an array}").unwrap();
    write_pages(dir.path(), "b.json", &json!([{"page_content": "reached"}]));

    let config = PipelineConfig::builder()
        .chunk_size(50)
        .overlap(0)
        .failure_policy(FailurePolicy::Continue)
        .build()
        .unwrap();
    let summary = Pipeline::new(config)
        .unwrap()
        .run(dir.path(), &output, &mut NoProgress)
        .unwrap();

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.files.len(), 1);
    assert_eq!(read_jsonl(&output.join("b_chunks.jsonl")).len(), 1);
}

#[test]
fn test_metadata_passes_through_unchanged() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let metadata = json!({
        "source": "guide.pdf",
        "source_path": "data/raw/varsity/guide.pdf",
        "category": "varsity",
        "page_number": 4,
        "page_label": "4",
        "total_pages": 10,
        "text_length": 11,
        "load_date": "2024-01-01T00:00:00"
    });
    write_pages(
        dir.path(),
        "guide.json",
        &json!([{"page_content": "hello world", "metadata": metadata}]),
    );

    process(dir.path(), &output, 500, 50, OutputEncoding::LineDelimited, 100).unwrap();
    let line = fs::read_to_string(output.join("guide_chunks.jsonl")).unwrap();
    let value: Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(value["metadata"], metadata);
    assert_eq!(
        value.as_object().unwrap().keys().collect::<Vec<_>>(),
        vec!["chunk_id", "chunk_content", "metadata"]
    );
}

#[test]
fn test_output_directory_is_created() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("nested").join("deeper");
    write_pages(dir.path(), "p.json", &json!([{"page_content": "abc"}]));

    process(dir.path(), &output, 10, 0, OutputEncoding::SingleArray, 10).unwrap();
    assert!(output.join("p_chunks.json").is_file());
}

#[test]
fn test_missing_metadata_uses_fallback_ids() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    write_pages(dir.path(), "p.json", &json!([{"page_content": "abcdef"}]));

    process(dir.path(), &output, 3, 0, OutputEncoding::LineDelimited, 10).unwrap();
    let records = read_jsonl(&output.join("p_chunks.jsonl"));
    assert_eq!(records[0].chunk_id, "unknown_page0_chunk1");
    assert_eq!(records[1].chunk_id, "unknown_page0_chunk2");
    assert!(records[0].metadata.is_empty());
}
