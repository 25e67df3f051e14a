use crate::domain::{PaymentRecord, UserAccount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The entire persistent state: one JSON document with four top-level
/// mappings. `stats` is reserved and currently unused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub users: HashMap<String, UserAccount>,
    #[serde(default)]
    pub premium: HashMap<String, String>,
    #[serde(default)]
    pub payments: HashMap<String, PaymentRecord>,
    #[serde(default)]
    pub stats: HashMap<String, serde_json::Value>,
}

/// Document store with full-rewrite persistence.
///
/// Every mutation runs as a single critical section: the in-memory
/// document is locked, modified, and rewritten to disk before the lock
/// is released, so two logical operations can never interleave their
/// read-modify-write cycles.
///
/// A failed rewrite is logged and otherwise ignored; the in-memory
/// mutation is kept. Data loss on restart is an accepted trade-off for
/// availability.
pub struct JsonStore {
    path: PathBuf,
    doc: Mutex<StoreDocument>,
}

impl JsonStore {
    /// Open the store at `path`, loading the existing document if one is
    /// there. A missing file yields an empty document; a corrupt one is
    /// logged and replaced by an empty document on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = Self::load(&path);
        Self {
            path,
            doc: Mutex::new(doc),
        }
    }

    fn load(path: &Path) -> StoreDocument {
        if !path.exists() {
            info!(path = %path.display(), "No store document found, starting empty");
            return StoreDocument::default();
        }
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<StoreDocument>(&raw) {
                Ok(doc) => {
                    info!(
                        path = %path.display(),
                        users = doc.users.len(),
                        "Loaded store document"
                    );
                    doc
                }
                Err(e) => {
                    error!(path = %path.display(), "Failed to parse store document: {}", e);
                    StoreDocument::default()
                }
            },
            Err(e) => {
                error!(path = %path.display(), "Failed to read store document: {}", e);
                StoreDocument::default()
            }
        }
    }

    /// Run a read-only closure against the document.
    pub fn read<R>(&self, f: impl FnOnce(&StoreDocument) -> R) -> R {
        let doc = self.doc.lock().unwrap_or_else(PoisonError::into_inner);
        f(&doc)
    }

    /// Run a mutating closure and rewrite the full document, all under
    /// one lock acquisition.
    pub fn update<R>(&self, f: impl FnOnce(&mut StoreDocument) -> R) -> R {
        self.update_if(|doc| (f(doc), true))
    }

    /// Like [`update`](Self::update), but the closure reports whether it
    /// changed anything; the document is rewritten only when it did.
    /// Used by reads that may prune, which mostly change nothing.
    pub fn update_if<R>(&self, f: impl FnOnce(&mut StoreDocument) -> (R, bool)) -> R {
        let mut doc = self.doc.lock().unwrap_or_else(PoisonError::into_inner);
        let (result, dirty) = f(&mut doc);
        if dirty {
            if let Err(e) = self.persist(&doc) {
                warn!(path = %self.path.display(), "Failed to persist store: {}", e);
            }
        }
        result
    }

    fn persist(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserAccount;

    fn temp_store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("data").join("store.json")
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(temp_store_path(&dir));
        assert_eq!(store.read(|d| d.users.len()), 0);
        assert_eq!(store.read(|d| d.premium.len()), 0);
    }

    #[test]
    fn mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_store_path(&dir);

        let store = JsonStore::open(&path);
        store.update(|doc| {
            doc.users
                .insert("42".to_string(), UserAccount::new(None, None));
            doc.premium
                .insert("42".to_string(), "2099-01-01 00:00:00".to_string());
        });
        drop(store);

        let reopened = JsonStore::open(&path);
        assert!(reopened.read(|d| d.users.contains_key("42")));
        assert_eq!(
            reopened.read(|d| d.premium.get("42").cloned()),
            Some("2099-01-01 00:00:00".to_string())
        );
    }

    #[test]
    fn corrupt_document_is_replaced_by_empty_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonStore::open(&path);
        assert_eq!(store.read(|d| d.users.len()), 0);
    }

    #[test]
    fn missing_top_level_keys_default_to_empty_maps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"users": {}}"#).unwrap();

        let store = JsonStore::open(&path);
        assert_eq!(store.read(|d| d.payments.len()), 0);
        assert_eq!(store.read(|d| d.stats.len()), 0);
    }
}
