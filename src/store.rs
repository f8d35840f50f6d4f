//! Snapshot persistence for the item collection.
//!
//! The scheduling engine never touches this; `main` loads a snapshot,
//! hands the items to the pure functions, and saves whatever comes back.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{MonthId, StudyItem};

pub const STORE_ENV_VAR: &str = "ALGOMASTER_STORE";
const DEFAULT_STORE_NAME: &str = "items.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no item with id '{0}'")]
    ItemNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_month: MonthId,
    pub items: Vec<StudyItem>,
}

impl Snapshot {
    pub fn new(current_month: MonthId) -> Self {
        Self {
            current_month,
            items: Vec::new(),
        }
    }

    /// Items belonging to the active monthly cycle, in stored order.
    pub fn month_items(&self) -> Vec<StudyItem> {
        self.items
            .iter()
            .filter(|item| item.month_id == self.current_month)
            .cloned()
            .collect()
    }

    pub fn find_item(&self, id: &str) -> Option<&StudyItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Replace the stored item with the same id.
    pub fn replace_item(&mut self, updated: StudyItem) -> Result<(), StoreError> {
        match self.items.iter_mut().find(|item| item.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                Ok(())
            }
            None => Err(StoreError::ItemNotFound(updated.id)),
        }
    }

    /// Next free sequential id ("itm-1", "itm-2", ...). Deterministic so
    /// repeated imports of the same data produce the same ids.
    pub fn next_id(&self) -> String {
        let max = self
            .items
            .iter()
            .filter_map(|item| item.id.strip_prefix("itm-"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("itm-{}", max + 1)
    }
}

pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `$ALGOMASTER_STORE` wins; otherwise a file under the user data dir.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(STORE_ENV_VAR) {
            return PathBuf::from(path);
        }

        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("algomaster");
        data_dir.join(DEFAULT_STORE_NAME)
    }

    /// Load the snapshot, or start a fresh one for `month` when the store
    /// does not exist yet.
    pub fn load_or_init(&self, month: MonthId) -> Result<Snapshot, StoreError> {
        if !self.path.exists() {
            return Ok(Snapshot::new(month));
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
