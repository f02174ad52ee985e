//! Durable key-value slots.
//!
//! A slot holds opaque string blobs under fixed keys. Writes must be atomic
//! from the caller's point of view: a reader sees either the old or the new
//! value, never a torn one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::NamedTempFile;

use crate::error::StorageError;

pub trait Slot {
    /// Read the blob stored under `key`, `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory slot. Clones share the same map, which lets a test "restart"
/// the app against the data a previous instance wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a key directly, bypassing the ledger codec.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put_raw(key, value);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_failed = |e: std::io::Error| StorageError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        };
        fs::create_dir_all(&self.dir).map_err(write_failed)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_failed)?;
        tmp.write_all(value.as_bytes()).map_err(write_failed)?;
        tmp.as_file().sync_all().map_err(write_failed)?;
        tmp.persist(self.path_for(key))
            .map_err(|e| write_failed(e.error))?;
        Ok(())
    }
}
