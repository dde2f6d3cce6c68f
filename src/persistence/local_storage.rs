//! Browser LocalStorage backend

use web_sys::Storage;

use super::{PersistenceError, Progress, ProgressStore};

/// Progress kept in `window.localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "brickfall_progress";

    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Unavailable("localStorage not accessible".into()))
    }
}

impl ProgressStore for LocalStorageStore {
    fn load_unlocked_level(&self) -> Result<u32, PersistenceError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Ok(Progress::from_json(&json)?.unlocked_level),
            Ok(None) => Ok(1),
            Err(e) => Err(PersistenceError::Unavailable(format!("{e:?}"))),
        }
    }

    fn save_unlocked_level(&mut self, level: u32) -> Result<(), PersistenceError> {
        let storage = Self::storage()?;
        let json = Progress {
            unlocked_level: level,
        }
        .to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))?;
        log::info!("Progress saved: level {} unlocked", level);
        Ok(())
    }
}
