use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use super::tabs::TabRegistry;

/// Fixed name of the persisted tab record.
pub const TABS_RECORD_KEY: &str = "workspace-tabs";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access tab record: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tab record: {0}")]
    ParseFailed(#[from] serde_json::Error),
    #[error("invalid tab record: {0}")]
    Invalid(String),
}

/// Durable storage for the open-tab record, mockable in tests.
#[cfg_attr(test, mockall::automock)]
pub trait TabStorage: Send + Sync {
    fn save_tabs(&self, record: &TabRegistry) -> Result<(), StorageError>;
    /// `Ok(None)` when nothing has been stored yet.
    fn load_tabs(&self) -> Result<Option<TabRegistry>, StorageError>;
}

/// Stores the record as `<dir>/<key>.json`.
pub struct FileStorage {
    dir: PathBuf,
    key: String,
}

impl FileStorage {
    pub fn new(dir: &Path) -> Self {
        Self::with_key(dir, TABS_RECORD_KEY)
    }

    pub fn with_key(dir: &Path, key: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            key: key.to_string(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    /// Delete the stored record, if any.
    pub fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl TabStorage for FileStorage {
    fn save_tabs(&self, record: &TabRegistry) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(self.path(), json)?;
        Ok(())
    }

    fn load_tabs(&self) -> Result<Option<TabRegistry>, StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let record: TabRegistry = serde_json::from_str(&contents)?;
        validate(record).map(Some)
    }
}

/// Reject records with duplicate tab ids; drop an active id that names no tab.
pub fn validate(mut record: TabRegistry) -> Result<TabRegistry, StorageError> {
    let mut seen = HashSet::new();
    for tab in record.tabs() {
        if !seen.insert(tab.id.as_str()) {
            return Err(StorageError::Invalid(format!("duplicate tab id {:?}", tab.id)));
        }
    }
    if let Some(active) = record.active_tab_id()
        && record.get(active).is_none()
    {
        let active = active.to_string();
        record.set_active_tab(None);
        warn!(active = %active, "stored active tab is not open, clearing it");
    }
    Ok(record)
}

/// Load the stored record, falling back to the empty state on any failure.
pub fn load_or_default(storage: &dyn TabStorage) -> TabRegistry {
    match storage.load_tabs() {
        Ok(Some(record)) => record,
        Ok(None) => TabRegistry::default(),
        Err(e) => {
            warn!(error = %e, "discarding unreadable tab record");
            TabRegistry::default()
        }
    }
}
