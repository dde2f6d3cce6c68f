//! Native progress file

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{PersistenceError, Progress, ProgressStore};

/// Progress stored as a small JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressStore for JsonFileStore {
    fn load_unlocked_level(&self) -> Result<u32, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Progress::from_json(&json)?.unlocked_level),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(1),
            Err(e) => Err(e.into()),
        }
    }

    fn save_unlocked_level(&mut self, level: u32) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = Progress {
            unlocked_level: level,
        }
        .to_json()?;
        fs::write(&self.path, json)?;
        log::debug!("Saved progress to {}", self.path.display());
        Ok(())
    }
}
