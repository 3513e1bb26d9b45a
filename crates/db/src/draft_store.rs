//! Local persistence for the guest draft snapshot. File-backed in the
//! app, memory-backed in tests.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tidybook_core::bridge::{DraftSnapshot, DraftStoreError, LocalDraftStore};

/// One-snapshot JSON file. Writes go through a sibling temp file and a
/// rename so a crash mid-write leaves either the old snapshot or none,
/// never a torn one.
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut path = self.path.clone();
        path.set_extension("tmp");
        path
    }
}

impl LocalDraftStore for FileDraftStore {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), DraftStoreError> {
        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|error| DraftStoreError(error.to_string()))?;
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|error| DraftStoreError(error.to_string()))?;
        fs::rename(&temp, &self.path).map_err(|error| DraftStoreError(error.to_string()))?;
        Ok(())
    }

    fn load(&self) -> Result<Option<DraftSnapshot>, DraftStoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(DraftStoreError(error.to_string())),
        };
        let snapshot = serde_json::from_slice(&raw)
            .map_err(|error| DraftStoreError(error.to_string()))?;
        Ok(Some(snapshot))
    }

    fn clear(&self) -> Result<(), DraftStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(DraftStoreError(error.to_string())),
        }
    }
}

#[derive(Default)]
pub struct InMemoryDraftStore {
    slot: Mutex<Option<DraftSnapshot>>,
}

impl LocalDraftStore for InMemoryDraftStore {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), DraftStoreError> {
        let mut slot =
            self.slot.lock().map_err(|_| DraftStoreError("store lock poisoned".to_string()))?;
        *slot = Some(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<DraftSnapshot>, DraftStoreError> {
        let slot =
            self.slot.lock().map_err(|_| DraftStoreError("store lock poisoned".to_string()))?;
        Ok(slot.clone())
    }

    fn clear(&self) -> Result<(), DraftStoreError> {
        let mut slot =
            self.slot.lock().map_err(|_| DraftStoreError("store lock poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use tidybook_core::bridge::{DraftSnapshot, LocalDraftStore};

    use super::{FileDraftStore, InMemoryDraftStore};

    fn snapshot() -> DraftSnapshot {
        DraftSnapshot {
            category: None,
            service_id: Some(101),
            property_size: None,
            crew_size: Some(2),
            duration_hours: None,
            uses_own_materials: false,
            window_panel_count: None,
            addon_ids: vec![11, 12],
            step: 3,
        }
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileDraftStore::new(dir.path().join("draft.json"));

        assert_eq!(store.load().expect("empty load"), None);

        store.save(&snapshot()).expect("save");
        let loaded = store.load().expect("load").expect("present");
        assert_eq!(loaded.service_id, Some(101));
        assert_eq!(loaded.addon_ids, vec![11, 12]);

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load after clear"), None);
        // Clearing an already-empty store is not an error.
        store.clear().expect("idempotent clear");
    }

    #[test]
    fn corrupt_file_surfaces_as_a_store_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("draft.json");
        std::fs::write(&path, b"{ not json").expect("write corrupt file");

        let store = FileDraftStore::new(path);
        assert!(store.load().is_err());
    }

    #[test]
    fn memory_store_round_trips() {
        let store = InMemoryDraftStore::default();
        store.save(&snapshot()).expect("save");
        assert!(store.load().expect("load").is_some());
        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
    }
}
