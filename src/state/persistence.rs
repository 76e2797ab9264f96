use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while storing or restoring history
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize history: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write history: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read history: {0}")]
    ReadError(String),

    #[error("Invalid history data: {0}")]
    InvalidState(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A string key/value store for persisted documents.
pub trait BlobStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>>;

    fn set(&mut self, key: &str, value: String) -> PersistenceResult<()>;

    fn clear(&mut self, key: &str) -> PersistenceResult<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> PersistenceResult<()> {
        (**self).set(key, value)
    }

    fn clear(&mut self, key: &str) -> PersistenceResult<()> {
        (**self).clear(key)
    }
}

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> PersistenceResult<()> {
        self.blobs.insert(key.to_owned(), value);
        Ok(())
    }

    fn clear(&mut self, key: &str) -> PersistenceResult<()> {
        self.blobs.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{BlobStore, PersistenceError, PersistenceResult};

    /// Stores each key as a JSON file in a directory.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> PersistenceResult<PathBuf> {
            let valid = !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
                && !key.starts_with('.');
            if !valid {
                return Err(PersistenceError::InvalidState(format!(
                    "unusable storage key {key:?}"
                )));
            }
            Ok(self.dir.join(format!("{key}.json")))
        }
    }

    impl BlobStore for FileStore {
        fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
            let path = self.path_for(key)?;
            match fs::read_to_string(&path) {
                Ok(json) => Ok(Some(json)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(PersistenceError::ReadError(format!("{}: {e}", path.display()))),
            }
        }

        fn set(&mut self, key: &str, value: String) -> PersistenceResult<()> {
            let path = self.path_for(key)?;
            fs::create_dir_all(&self.dir)?;

            // Write beside the target, then swap it in
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, value)?;
            fs::rename(&tmp, &path)?;
            Ok(())
        }

        fn clear(&mut self, key: &str) -> PersistenceResult<()> {
            let path = self.path_for(key)?;
            match fs::remove_file(path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{BlobStore, PersistenceError, PersistenceResult};

    /// Browser `localStorage`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorage;

    impl LocalStorage {
        fn storage() -> PersistenceResult<web_sys::Storage> {
            web_sys::window()
                .ok_or_else(|| PersistenceError::Unavailable("no window".to_owned()))?
                .local_storage()
                .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))?
                .ok_or_else(|| PersistenceError::Unavailable("localStorage disabled".to_owned()))
        }
    }

    impl BlobStore for LocalStorage {
        fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
            Self::storage()?
                .get_item(key)
                .map_err(|e| PersistenceError::ReadError(format!("{e:?}")))
        }

        fn set(&mut self, key: &str, value: String) -> PersistenceResult<()> {
            Self::storage()?
                .set_item(key, &value)
                .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))
        }

        fn clear(&mut self, key: &str) -> PersistenceResult<()> {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("draw-history").unwrap(), None);

        store.set("draw-history", "[]".to_owned()).unwrap();
        assert_eq!(store.get("draw-history").unwrap().as_deref(), Some("[]"));

        store.clear("draw-history").unwrap();
        assert!(store.is_empty());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store() {
        let dir = std::env::temp_dir().join(format!("sketch_canvas_{}", uuid::Uuid::new_v4()));
        let mut store = FileStore::new(&dir);

        assert_eq!(store.get("draw-history").unwrap(), None);
        store.set("draw-history", "{}".to_owned()).unwrap();
        assert_eq!(store.get("draw-history").unwrap().as_deref(), Some("{}"));
        assert!(dir.join("draw-history.json").exists());

        store.clear("draw-history").unwrap();
        store.clear("draw-history").unwrap();
        assert_eq!(store.get("draw-history").unwrap(), None);

        assert!(matches!(
            store.set("../escape", String::new()),
            Err(PersistenceError::InvalidState(_))
        ));

        let _ = std::fs::remove_dir_all(dir);
    }
}
