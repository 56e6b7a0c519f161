use std::fs;
use std::io;
use std::path::PathBuf;

use gitsearch_core::{DurableStore, StorageError};
use gitsearch_engine::AtomicFileWriter;

/// Durable store keeping each key in its own `<key>.json` file under the data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    writer: AtomicFileWriter,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    fn file_name(key: &str) -> Result<String, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(format!("{key}.json"))
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.writer.dir().join(Self::file_name(key)?);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let filename = Self::file_name(key)?;
        self.writer
            .write(&filename, value)
            .map_err(|err| StorageError::Backend(err.to_string()))?;
        Ok(())
    }
}
