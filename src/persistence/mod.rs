//! Unlocked-level persistence
//!
//! Progress is a single high-water mark: the highest level the player has
//! reached. Stores are best-effort; callers fall back to level 1 on a failed
//! load and drop failed saves.
//!
//! Backends:
//! - [`MemoryStore`] for tests and headless runs
//! - [`JsonFileStore`] on native targets
//! - [`LocalStorageStore`] in the browser

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use serde::{Deserialize, Serialize};

/// Errors raised by progress stores
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stored progress document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub unlocked_level: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self { unlocked_level: 1 }
    }
}

impl Progress {
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let progress: Progress = serde_json::from_str(json)?;
        Ok(Self {
            unlocked_level: progress.unlocked_level.max(1),
        })
    }

    pub fn to_json(self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(&self)?)
    }
}

/// Key/value access to the unlocked-level high-water mark
pub trait ProgressStore {
    /// Highest unlocked level; 1 when nothing has been stored yet
    fn load_unlocked_level(&self) -> Result<u32, PersistenceError>;

    fn save_unlocked_level(&mut self, level: u32) -> Result<(), PersistenceError>;
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    level: Option<u32>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a level
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Some(level),
            unavailable: false,
        }
    }

    /// Store whose every operation fails, like a browser with storage disabled
    pub fn unavailable() -> Self {
        Self {
            level: None,
            unavailable: true,
        }
    }

    /// Last saved level, if any
    pub fn stored(&self) -> Option<u32> {
        self.level
    }
}

impl ProgressStore for MemoryStore {
    fn load_unlocked_level(&self) -> Result<u32, PersistenceError> {
        if self.unavailable {
            return Err(PersistenceError::Unavailable("memory store disabled".into()));
        }
        Ok(self.level.unwrap_or(1).max(1))
    }

    fn save_unlocked_level(&mut self, level: u32) -> Result<(), PersistenceError> {
        if self.unavailable {
            return Err(PersistenceError::Unavailable("memory store disabled".into()));
        }
        self.level = Some(level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_defaults_to_first_level() {
        let store = MemoryStore::new();
        assert_eq!(store.load_unlocked_level().unwrap(), 1);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.save_unlocked_level(7).unwrap();
        assert_eq!(store.load_unlocked_level().unwrap(), 7);
        assert_eq!(store.stored(), Some(7));
    }

    #[test]
    fn test_unavailable_store_errors() {
        let mut store = MemoryStore::unavailable();
        assert!(matches!(
            store.load_unlocked_level(),
            Err(PersistenceError::Unavailable(_))
        ));
        assert!(store.save_unlocked_level(3).is_err());
    }

    #[test]
    fn test_progress_json() {
        let progress = Progress::from_json(r#"{"unlocked_level":12}"#).unwrap();
        assert_eq!(progress.unlocked_level, 12);
        // Zero is not a level
        assert_eq!(Progress::from_json(r#"{"unlocked_level":0}"#).unwrap().unlocked_level, 1);
        assert!(matches!(
            Progress::from_json("not json"),
            Err(PersistenceError::Serialization(_))
        ));
    }
}
