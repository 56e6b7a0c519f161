use std::fs;

use gitsearch_engine::{ensure_data_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_data_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("nested").join("data");
    assert!(!new_dir.exists());
    ensure_data_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn data_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("plain");
    fs::write(&file_path, "x").unwrap();

    let err = ensure_data_dir(&file_path).unwrap_err();
    assert!(matches!(err, PersistError::DataDir(_)));
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("history.json", r#"{"list":[]}"#).unwrap();
    assert_eq!(first.file_name().unwrap(), "history.json");
    assert_eq!(fs::read_to_string(&first).unwrap(), r#"{"list":[]}"#);

    let second = writer.write("history.json", r#"{"list":[null]}"#).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), r#"{"list":[null]}"#);

    // Only the target remains; temp files are renamed away.
    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec!["history.json"]);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("history.json", "data").is_err());
    assert!(!file_path.with_file_name("history.json").exists());
}
