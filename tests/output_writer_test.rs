//! Writing documents to files and directories

use crawldoc::{CanonicalDocument, DedupMode, OutputFormat, write_output};
use serde_json::{Value, json};
use tempfile::TempDir;

mod common;

use common::build;

fn documents() -> Vec<CanonicalDocument> {
    vec![
        build(
            json!({"url": "https://docs.example.com/guide/", "markdown": "Guide with [link](https://x.example/)."}),
            DedupMode::Exact,
        ),
        build(
            json!({"url": "https://docs.example.com/", "markdown": "Home"}),
            DedupMode::Exact,
        ),
        build(
            json!({"url": "https://docs.example.com/broken", "success": false, "status_code": 500}),
            DedupMode::Exact,
        ),
    ]
}

#[tokio::test]
async fn test_single_document_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested/out.md");
    let docs = &documents()[..1];

    let written = write_output(docs, target.to_str(), OutputFormat::Markdown, true)
        .await
        .unwrap();

    assert_eq!(written, vec![target.clone()]);
    let contents = tokio::fs::read_to_string(&target).await.unwrap();
    assert_eq!(contents, "Guide with link.");
}

#[tokio::test]
async fn test_single_document_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("doc.json");

    write_output(&documents()[1..2], target.to_str(), OutputFormat::Json, false)
        .await
        .unwrap();

    let value: Value = serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(value["request_url"], "https://docs.example.com/");
    assert_eq!(value["markdown"], "Home");
    assert!(value["error_message"].is_null());
}

#[tokio::test]
async fn test_many_documents_as_combined_json() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("results");

    let written = write_output(&documents(), dir.to_str(), OutputFormat::Json, false)
        .await
        .unwrap();

    assert_eq!(written, vec![dir.join("crawl_results.json")]);
    let value: Value = serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
    let all = value.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2]["status"], "failed");
    assert_eq!(all[2]["error_message"], "HTTP 500 Internal Server Error");
}

#[tokio::test]
async fn test_many_documents_as_markdown_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = format!("{}/", temp_dir.path().display());

    let written = write_output(&documents(), Some(dir.as_str()), OutputFormat::Markdown, false)
        .await
        .unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["docs_example_com_guide.md".to_string(), "docs_example_com_index.md".to_string()]
    );
    let home = std::fs::read_to_string(temp_dir.path().join("docs_example_com_index.md")).unwrap();
    assert_eq!(home, "Home");
}

#[tokio::test]
async fn test_trailing_slash_forces_directory_for_single_document() {
    let temp_dir = TempDir::new().unwrap();
    let dir = format!("{}/single/", temp_dir.path().display());

    let written = write_output(&documents()[1..2], Some(dir.as_str()), OutputFormat::Markdown, false)
        .await
        .unwrap();

    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("single/docs_example_com_index.md"));
}

#[tokio::test]
async fn test_colliding_filenames_get_suffixes() {
    let temp_dir = TempDir::new().unwrap();
    let dir = format!("{}/", temp_dir.path().display());
    let docs = vec![
        build(json!({"url": "https://a.example/x", "markdown": "First"}), DedupMode::Exact),
        build(json!({"url": "https://a.example/x/", "markdown": "Second"}), DedupMode::Exact),
        build(json!({"url": "https://a.example/x?page=2", "markdown": "Third"}), DedupMode::Exact),
    ];

    let written = write_output(&docs, Some(dir.as_str()), OutputFormat::Markdown, false)
        .await
        .unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a_example_x.md", "a_example_x_2.md", "a_example_x_3.md"]);
    for (path, expected) in written.iter().zip(["First", "Second", "Third"]) {
        assert_eq!(std::fs::read_to_string(path).unwrap(), expected);
    }
}
