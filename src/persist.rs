use crate::ledger::AnswerRecord;
use crate::progress::{UserStats, ZoneProgress};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything that survives a reload. The session streak is deliberately
/// absent: it only rewards the current sitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub stats: UserStats,
    pub zones: Vec<ZoneProgress>,
    pub answers: Vec<AnswerRecord>,
}

/// Narrow persistence seam; the engine never knows what storage backs it.
pub trait SnapshotStore {
    /// Returns the stored snapshot, or None when absent or unreadable.
    fn load(&self) -> Option<Snapshot>;
    fn save(&self, snapshot: &Snapshot) -> std::io::Result<()>;
}

/// JSON file under the platform state directory, named by the configured
/// storage key.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(storage_key: &str) -> Self {
        let file = format!("{storage_key}.json");
        let path = if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("examquest")
                .join(file)
        } else if let Some(pd) = ProjectDirs::from("", "", "examquest") {
            pd.data_local_dir().join(file)
        } else {
            PathBuf::from(file)
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Option<Snapshot> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn save(&self, snapshot: &Snapshot) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(snapshot).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: RefCell<Option<Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Option<Snapshot> {
        self.slot.borrow().clone()
    }

    fn save(&self, snapshot: &Snapshot) -> std::io::Result<()> {
        *self.slot.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::progress::ProgressionGraph;
    use crate::zones::default_zones;
    use tempfile::tempdir;

    fn snapshot() -> Snapshot {
        let graph = ProgressionGraph::new(GameConfig::default(), &default_zones());
        Snapshot {
            stats: graph.stats().clone(),
            zones: graph.zones().to_vec(),
            answers: vec![],
        }
    }

    #[test]
    fn roundtrip_file_snapshot() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::with_path(dir.path().join("save.json"));
        let snap = snapshot();
        store.save(&snap).unwrap();
        assert_eq!(store.load(), Some(snap));
    }

    #[test]
    fn load_missing_snapshot_is_none() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::with_path(dir.path().join("nope.json"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn load_corrupt_snapshot_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, b"{ not json").unwrap();
        let store = FileSnapshotStore::with_path(&path);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemorySnapshotStore::new();
        assert_eq!(store.load(), None);
        let snap = snapshot();
        store.save(&snap).unwrap();
        assert_eq!(store.load(), Some(snap));
    }

    #[test]
    fn storage_key_names_the_blob() {
        let store = FileSnapshotStore::new("examquest");
        assert_eq!(
            store.path().file_name().unwrap().to_str().unwrap(),
            "examquest.json"
        );
    }
}
