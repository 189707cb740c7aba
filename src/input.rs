//! Input corpus loading.
//!
//! Walks an already-populated directory tree for `.json` files and parses
//! each one into session records. A file holds either a single object or
//! an array of objects; both shapes merge into one flat batch.
//!
//! Missing directory, zero files, or malformed JSON are fatal — these are
//! the run-aborting conditions of the error taxonomy. Missing or null
//! fields inside a record are not: they parse to `None` and degrade the
//! row downstream instead of dropping it.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{PipelineError, Record};

/// Recursively collect all `.json` files under `dir`, sorted for a
/// deterministic batch order.
pub fn find_json_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(PipelineError::MissingInputDir(dir.display().to_string()).into());
    }

    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort();

    if files.is_empty() {
        return Err(PipelineError::NoInputFiles(dir.display().to_string()).into());
    }

    info!(dir = %dir.display(), files = files.len(), "Input files discovered");
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(())
}

/// Parse every file into records, merging object and array shapes.
pub fn load_records(paths: &[PathBuf]) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for path in paths {
        let contents = std::fs::read_to_string(path).map_err(|e| PipelineError::MalformedInput {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let value: serde_json::Value =
            serde_json::from_str(&contents).map_err(|e| PipelineError::MalformedInput {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let batch = match value {
            serde_json::Value::Array(items) => items,
            other => vec![other],
        };

        for item in batch {
            let record: Record =
                serde_json::from_value(item).map_err(|e| PipelineError::MalformedInput {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            records.push(record);
        }

        debug!(path = %path.display(), total = records.len(), "File merged");
    }

    info!(records = records.len(), "Input corpus loaded");
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("stakelens_test_input_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&p).unwrap();
        p
    }

    #[test]
    fn test_find_json_files_recursive_and_sorted() {
        let dir = temp_dir();
        std::fs::create_dir_all(dir.join("nested/deeper")).unwrap();
        std::fs::write(dir.join("b.json"), "{}").unwrap();
        std::fs::write(dir.join("a.json"), "{}").unwrap();
        std::fs::write(dir.join("nested/deeper/c.json"), "{}").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let files = find_json_files(&dir).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files[0].ends_with("a.json"));
        assert!(files[1].ends_with("b.json"));
        assert!(files[2].ends_with("c.json"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_dir_is_fatal() {
        let err = find_json_files("/tmp/stakelens_no_such_dir_12345").unwrap_err();
        assert!(err.to_string().contains("Input directory not found"));
    }

    #[test]
    fn test_empty_dir_is_fatal() {
        let dir = temp_dir();
        let err = find_json_files(&dir).unwrap_err();
        assert!(err.to_string().contains("No JSON files"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_records_object_and_array() {
        let dir = temp_dir();
        std::fs::write(
            dir.join("single.json"),
            r#"{"currency": "btc", "amount": 1.0}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("list.json"),
            r#"[{"currency": "eth"}, {"currency": "ltc"}]"#,
        )
        .unwrap();

        let files = find_json_files(&dir).unwrap();
        let records = load_records(&files).unwrap();
        assert_eq!(records.len(), 3);
        let currencies: Vec<_> = records.iter().filter_map(|r| r.currency.clone()).collect();
        assert!(currencies.contains(&"btc".to_string()));
        assert!(currencies.contains(&"eth".to_string()));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = temp_dir();
        std::fs::write(dir.join("bad.json"), "{not json").unwrap();

        let files = find_json_files(&dir).unwrap();
        let err = load_records(&files).unwrap_err();
        assert!(err.to_string().contains("Malformed input file"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
