use dupscan::duplicates::{DuplicateFinder, FinderConfig, SearchStyle};
use dupscan::error::ExitCode;
use dupscan::output::{CsvOutput, JsonOutput, TextOutput};
use std::fs;
use tempfile::tempdir;

fn scan_fixture(
    style: SearchStyle,
) -> (
    tempfile::TempDir,
    dupscan::duplicates::KeyIndex,
    dupscan::duplicates::ScanSummary,
) {
    let app = tempdir().unwrap();
    let root = tempdir().unwrap();
    fs::write(root.path().join("a.txt"), b"hello").unwrap();
    fs::write(root.path().join("b.txt"), b"hello").unwrap();
    fs::write(root.path().join("c.txt"), b"world!").unwrap();

    let finder = DuplicateFinder::new(
        app.path().join("app"),
        FinderConfig::default().with_search_style(style),
    )
    .unwrap();
    let (index, summary) = finder.scan(root.path()).unwrap();
    (root, index, summary)
}

#[test]
fn test_json_export_of_content_scan() {
    let (root, index, summary) = scan_fixture(SearchStyle::ByContents);
    let json = JsonOutput::new(&index, &summary, SearchStyle::ByContents, ExitCode::Success)
        .to_json_pretty()
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["search_style"], "contents");
    assert_eq!(
        value["groups"][0]["key"],
        "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
    );
    let files = value["groups"][0]["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(
        files[0],
        &*root.path().join("a.txt").to_string_lossy()
    );
    assert_eq!(value["summary"]["total_files"], 3);
    assert_eq!(value["summary"]["duplicate_groups"], 1);
}

#[test]
fn test_csv_export_of_size_scan() {
    let (root, index, _) = scan_fixture(SearchStyle::BySize);
    let csv = CsvOutput::new(&index).to_string().unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][1], "5");
    assert_eq!(
        &rows[1][2],
        &*root.path().join("b.txt").to_string_lossy()
    );
}

#[test]
fn test_text_output_lists_group_paths() {
    let (root, index, summary) = scan_fixture(SearchStyle::BySize);
    let text = TextOutput::new(&index, &summary, SearchStyle::BySize).to_string();

    assert!(text.contains("(5 bytes)"));
    assert!(text.contains(&root.path().join("a.txt").display().to_string()));
    assert!(!text.contains("c.txt"));
    assert!(text.contains("Found 1 duplicate group"));
}
