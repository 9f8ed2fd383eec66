//! Durable storage for the company dataset.
//!
//! The dataset is one JSON blob: load it whole, save it whole. Concurrent
//! writers are not locked out; sessions detect each other through the
//! dataset fingerprint instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;
use thiserror::Error;
use tracing::warn;

use crate::domain::entities::Company;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "GuildPriceBoard";
const APP_NAME: &str = "GuildPriceBoard";
const DATA_FILENAME: &str = "guild_data.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

/// On-disk dataset blob with a save timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedDataset {
    /// Unix timestamp (seconds) of the save.
    pub saved_at: u64,
    pub companies: Vec<Company>,
}

impl PersistedDataset {
    pub fn new(companies: Vec<Company>) -> Self {
        let saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self { saved_at, companies }
    }
}

/// Loads and saves the dataset at a fixed path.
#[derive(Clone, Debug)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    /// Store backed by an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn default_location() -> Result<Self, StoreError> {
        let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
            .ok_or(StoreError::StorageUnavailable)?;
        Ok(Self {
            path: dirs.data_dir().join(DATA_FILENAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The persisted blob, or `None` when nothing was saved yet or the file
    /// is unreadable (the next save replaces it).
    pub fn load(&self) -> Option<PersistedDataset> {
        if !self.path.exists() {
            return None;
        }
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(persisted) => Some(persisted),
                Err(error) => {
                    warn!(%error, path = %self.path.display(), "failed to parse dataset blob");
                    None
                }
            },
            Err(error) => {
                warn!(%error, path = %self.path.display(), "failed to read dataset blob");
                None
            }
        }
    }

    /// Companies from the persisted blob; absence is an empty dataset.
    pub fn load_companies(&self) -> Vec<Company> {
        self.load()
            .map(|persisted| persisted.companies)
            .unwrap_or_default()
    }

    pub fn save(&self, companies: &[Company]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let blob = PersistedDataset::new(companies.to_vec());
        let json = serde_json::to_string_pretty(&blob)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Company, Good};

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("guild_price_board_{}_{}", std::process::id(), name))
    }

    fn sample() -> Vec<Company> {
        vec![Company {
            name: "Flip Co".to_string(),
            industry: "Agriculture".to_string(),
            professions: vec!["Agriculture".to_string()],
            timezone_offset_minutes: -420,
            goods: vec![Good {
                produced_good: "Rations".to_string(),
                live_exc_price: 43,
                discount_percent: 20,
                guildees_pay: 34.5,
                ..Good::default()
            }],
        }]
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = DatasetStore::at(scratch_file("round_trip.json"));
        let companies = sample();

        store.save(&companies).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.companies, companies);
        assert!(loaded.saved_at > 0);

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let store = DatasetStore::at(scratch_file("does_not_exist.json"));
        assert!(store.load().is_none());
        assert!(store.load_companies().is_empty());
    }

    #[test]
    fn corrupt_blob_loads_as_none() {
        let path = scratch_file("corrupt.json");
        fs::write(&path, "not json at all").unwrap();

        let store = DatasetStore::at(&path);
        assert!(store.load().is_none());

        let _ = fs::remove_file(path);
    }
}
