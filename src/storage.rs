//! Durable key-value storage for the board lists.
//!
//! The board persists two string-keyed entries ([`KEY_PENDING`] and
//! [`KEY_DONE`]), each holding a JSON array of task records. The default
//! backend keeps one `<key>.json` file per entry under the data directory.

use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// Storage key for the pending list.
pub const KEY_PENDING: &str = "tasks";

/// Storage key for the done list.
pub const KEY_DONE: &str = "done";

/// String-keyed durable storage port.
pub trait Storage {
    /// Returns the stored value for `key`, or `None` when absent.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for std::rc::Rc<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

/// File-backed storage: one `<key>.json` file per key under `dir`.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// In-memory storage for tests and embedding.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Application data directory: `$TODOR_DATA_DIR` when set, otherwise a
/// `todor` directory under the platform config location.
pub fn data_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("TODOR_DATA_DIR") {
        return Some(PathBuf::from(dir));
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var_os("LOCALAPPDATA").map(|d| PathBuf::from(d).join("todor"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config").join("todor"))
    }
}
