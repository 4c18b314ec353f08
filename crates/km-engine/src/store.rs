//! Kingdom persistence.
//!
//! A store keeps whole kingdoms by id. Engines only ever talk to it through
//! [`KingdomStore::save`], which merges a patch into the stored copy.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use km_core::{Kingdom, KingdomPatch};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// Storage for kingdoms, keyed by id.
pub trait KingdomStore: Send {
    /// The stored kingdom, or a default one when none was saved yet.
    fn load(&self, id: &str) -> EngineResult<Kingdom>;

    /// Overwrite the stored kingdom.
    fn replace(&self, id: &str, kingdom: &Kingdom) -> EngineResult<()>;

    /// Whether a kingdom was saved under `id`.
    fn exists(&self, id: &str) -> bool;

    /// Merge `patch` into the stored kingdom and return the result.
    fn save(&self, id: &str, patch: KingdomPatch) -> EngineResult<Kingdom> {
        let kingdom = patch.applied_to(&self.load(id)?);
        self.replace(id, &kingdom)?;
        Ok(kingdom)
    }
}

fn check_id(id: &str) -> EngineResult<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(EngineError::InvalidAction(format!(
            "kingdom id '{id}' may only contain letters, digits, '-' and '_'"
        )))
    }
}

/// Kingdoms held in memory, for tests and embedding hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    kingdoms: RwLock<HashMap<String, Kingdom>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding one kingdom.
    pub fn with_kingdom(id: impl Into<String>, kingdom: Kingdom) -> Self {
        let mut kingdoms = HashMap::new();
        kingdoms.insert(id.into(), kingdom);
        Self {
            kingdoms: RwLock::new(kingdoms),
        }
    }
}

impl KingdomStore for MemoryStore {
    fn load(&self, id: &str) -> EngineResult<Kingdom> {
        let kingdoms = self
            .kingdoms
            .read()
            .map_err(|e| EngineError::Persistence(format!("lock error: {e}")))?;
        Ok(kingdoms.get(id).cloned().unwrap_or_default())
    }

    fn replace(&self, id: &str, kingdom: &Kingdom) -> EngineResult<()> {
        let mut kingdoms = self
            .kingdoms
            .write()
            .map_err(|e| EngineError::Persistence(format!("lock error: {e}")))?;
        kingdoms.insert(id.to_string(), kingdom.clone());
        Ok(())
    }

    fn exists(&self, id: &str) -> bool {
        self.kingdoms
            .read()
            .map(|kingdoms| kingdoms.contains_key(id))
            .unwrap_or(false)
    }
}

/// Kingdoms stored as `<id>.json` files in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store, creating the directory when missing.
    pub fn new(base_dir: impl AsRef<Path>) -> EngineResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// The directory kingdoms are written to.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{id}.json"))
    }

    /// Ids of every stored kingdom, sorted.
    pub fn list_ids(&self) -> EngineResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            let id = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(".json"));
            if let Some(id) = id {
                ids.push(id.to_string());
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

impl KingdomStore for JsonFileStore {
    fn load(&self, id: &str) -> EngineResult<Kingdom> {
        check_id(id)?;
        let path = self.path(id);
        if !path.exists() {
            debug!(id, "no stored kingdom, using defaults");
            return Ok(Kingdom::default());
        }
        let text = fs::read_to_string(&path)?;
        let kingdom = serde_json::from_str(&text)?;
        debug!("Loaded kingdom[{}] from {}", id, path.display());
        Ok(kingdom)
    }

    fn replace(&self, id: &str, kingdom: &Kingdom) -> EngineResult<()> {
        check_id(id)?;
        let path = self.path(id);
        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(kingdom)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;
        debug!("Saved kingdom[{}] to {}", id, path.display());
        Ok(())
    }

    fn exists(&self, id: &str) -> bool {
        check_id(id).is_ok() && self.path(id).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unrest(value: i32) -> KingdomPatch {
        KingdomPatch {
            unrest: Some(value),
            ..KingdomPatch::default()
        }
    }

    #[test]
    fn memory_store_defaults_and_saves() {
        let store = MemoryStore::new();
        assert!(!store.exists("k"));
        assert_eq!(store.load("k").unwrap(), Kingdom::default());
        let saved = store.save("k", unrest(3)).unwrap();
        assert_eq!(saved.unrest, 3);
        assert_eq!(store.load("k").unwrap().unrest, 3);
        assert!(store.exists("k"));
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("kingdoms")).unwrap();
        store.save("stolen-lands", unrest(4)).unwrap();
        let reopened = JsonFileStore::new(dir.path().join("kingdoms")).unwrap();
        assert_eq!(reopened.load("stolen-lands").unwrap().unrest, 4);
        assert_eq!(reopened.list_ids().unwrap(), vec!["stolen-lands".to_string()]);
        assert!(!dir.path().join("kingdoms/stolen-lands.json.tmp").exists());
    }

    #[test]
    fn file_store_rejects_path_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.load("../escape"),
            Err(EngineError::InvalidAction(_))
        ));
        assert!(!store.exists("../escape"));
    }

    #[test]
    fn malformed_file_is_a_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(matches!(store.load("bad"), Err(EngineError::Serde(_))));
    }
}
