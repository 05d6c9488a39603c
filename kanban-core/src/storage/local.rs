/// Local filesystem storage backend.
///
/// Each key maps to `<dir>/<key>.json` with:
/// - Atomic writes (write to .tmp, fsync, rename)
/// - Mutex-guarded writes so concurrent saves never interleave on disk

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{validate_key, BoardStorage, StorageError};

pub struct LocalStorage {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStorage {
    /// Open (and create if needed) a storage directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl BoardStorage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, &path)?;

        log::debug!(
            target: "kanban.storage",
            "Wrote {} bytes to {}",
            value.len(),
            path.display()
        );
        Ok(())
    }
}
