//! Document loading from files and directories.

use blueprint_schema::{DocumentLoadError, load_document, load_documents, load_inputs};
use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;

fn utf8(temp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 temp path")
}

#[test]
fn missing_directory_is_empty() {
    let temp = tempfile::tempdir().expect("tempdir");
    let docs = load_documents(&utf8(&temp).join("nope")).expect("scan");
    assert!(docs.is_empty());
}

#[test]
fn scan_is_sorted_and_keeps_bad_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = utf8(&temp);
    fs::write(root.join("b.json"), r#"{"version":"v1.0"}"#).expect("write b");
    fs::write(root.join("a.json"), "{ not json").expect("write a");
    fs::write(root.join("notes.txt"), "ignored").expect("write txt");

    let docs = load_documents(&root).expect("scan");
    let names: Vec<&str> = docs.iter().filter_map(|d| d.path.file_name()).collect();
    assert_eq!(names, vec!["a.json", "b.json"]);
    assert!(matches!(docs[0].document, Err(DocumentLoadError::Json { .. })));
    assert!(docs[1].document.is_ok());
}

#[test]
fn unreadable_file_is_io_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let err = load_document(&utf8(&temp).join("missing.json")).expect_err("missing file");
    assert!(matches!(err, DocumentLoadError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn inputs_mix_files_and_directories() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = utf8(&temp);
    let dir = root.join("batch");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("one.json"), "{}").expect("write one");
    fs::write(dir.join("two.json"), "[]").expect("write two");
    fs::write(root.join("single.json"), "{}").expect("write single");

    let docs = load_inputs(&[root.join("single.json"), dir.clone()]).expect("inputs");
    let names: Vec<&str> = docs.iter().filter_map(|d| d.path.file_name()).collect();
    assert_eq!(names, vec!["single.json", "one.json", "two.json"]);
}
