//! JSON object files for registered commands and known facts.
//!
//! Both files are flat JSON objects matched in the order entries were added,
//! so callers load them into an `IndexMap` to keep document order.

use crate::error::MemoryError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Read a JSON document, returning `None` when the file does not exist.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, MemoryError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(MemoryError::Io(err)),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Rewrite a JSON document atomically (temp file then rename), pretty-printed.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), MemoryError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    let serialized = serde_json::to_string_pretty(value)?;
    let temp_path = temp_path(path);
    {
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&temp_path)?;
        file.write_all(serialized.as_bytes())?;
        file.write_all(b"\n")?;
    }
    std::fs::rename(&temp_path, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::{read_json_file, write_json_file};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn keeps_document_order_through_disk() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("facts.json");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, r#"{"zebra": "1", "apple": "2", "mango": "3"}"#).expect("write");

        let mut map: IndexMap<String, String> = read_json_file(&path).expect("read").expect("present");
        assert_eq!(
            map.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["zebra", "apple", "mango"]
        );

        map.insert("apple".to_string(), "20".to_string());
        map.insert("kiwi".to_string(), "4".to_string());
        write_json_file(&path, &map).expect("write back");

        let reloaded: IndexMap<String, String> = read_json_file(&path).expect("read").expect("present");
        assert_eq!(
            reloaded
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect::<Vec<_>>(),
            vec![("zebra", "1"), ("apple", "20"), ("mango", "3"), ("kiwi", "4")]
        );
        assert!(!dir.path().join("nested").join("facts.json.tmp").exists());
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempdir().expect("tempdir");
        let result: Option<IndexMap<String, String>> =
            read_json_file(&dir.path().join("absent.json")).expect("read");
        assert!(result.is_none());
    }
}
