//! Local automaton store.
//!
//! Each record is one pretty-printed JSON file named `<id>.json` under
//! the store directory, with `index.json` mapping record ids to metadata.
//! Record checksums are verified on load; a mismatch surfaces as
//! [`StoreError::Corruption`] rather than a silently wrong automaton.

use crate::error::StoreError;
use fsmkit_core::Automaton;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Metadata kept in the index for each record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMeta {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub size_bytes: u64,
    pub checksum: String,
}

/// A stored automaton with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatonRecord {
    pub id: String,

    pub name: String,

    pub automaton: Automaton,

    /// Creation timestamp (Unix millis).
    pub created_at: i64,
}

/// Store of named automata under a data directory.
pub struct AutomatonStore {
    dir: PathBuf,
    /// In-memory index of records by id.
    index: RwLock<HashMap<String, RecordMeta>>,
}

impl AutomatonStore {
    /// Opens or creates a store at the given directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let store = Self {
            dir,
            index: RwLock::new(HashMap::new()),
        };

        store.load_index()?;

        Ok(store)
    }

    /// Loads the record index from disk.
    fn load_index(&self) -> Result<(), StoreError> {
        let index_path = self.dir.join("index.json");
        if !index_path.exists() {
            return Ok(());
        }

        let file = File::open(&index_path)?;
        let reader = BufReader::new(file);
        let index: HashMap<String, RecordMeta> = serde_json::from_reader(reader)?;
        *self.index.write() = index;

        Ok(())
    }

    /// Saves the record index to disk.
    fn save_index(&self) -> Result<(), StoreError> {
        let index_path = self.dir.join("index.json");
        let file = File::create(&index_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &*self.index.read())?;
        Ok(())
    }

    /// Stores an automaton under a display name, returning the generated
    /// record id. Every save allocates a fresh id.
    pub fn save(&self, name: &str, automaton: &Automaton) -> Result<String, StoreError> {
        let record = AutomatonRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            automaton: automaton.clone(),
            created_at: now_millis(),
        };

        let data = serde_json::to_vec_pretty(&record)?;
        let checksum = format!("{:08x}", crc32c::crc32c(&data));

        let path = self.record_path(&record.id);
        let mut file = File::create(&path)?;
        file.write_all(&data)?;
        file.sync_all()?;

        let meta = RecordMeta {
            id: record.id.clone(),
            name: record.name.clone(),
            created_at: record.created_at,
            size_bytes: data.len() as u64,
            checksum,
        };

        {
            let mut index = self.index.write();
            index.insert(record.id.clone(), meta);
        }
        self.save_index()?;

        tracing::info!("Saved automaton '{}' as record {}", record.name, record.id);

        Ok(record.id)
    }

    /// Loads a record by id. Returns `None` when the id is unknown.
    pub fn load(&self, id: &str) -> Result<Option<AutomatonRecord>, StoreError> {
        let meta = self.index.read().get(id).cloned();

        match meta {
            Some(meta) => Ok(Some(self.read_record(&meta)?)),
            None => Ok(None),
        }
    }

    /// Deletes a record by id. Deleting an unknown id is a no-op.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.record_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
        }

        let removed = self.index.write().remove(id).is_some();
        if removed {
            self.save_index()?;
            tracing::info!("Deleted automaton record {}", id);
        }

        Ok(())
    }

    /// Lists all records, oldest first (ties broken by id).
    pub fn list(&self) -> Result<Vec<AutomatonRecord>, StoreError> {
        let mut metas: Vec<RecordMeta> = self.index.read().values().cloned().collect();
        metas.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        metas
            .iter()
            .map(|meta| self.read_record(meta))
            .collect()
    }

    /// Returns the number of stored records.
    pub fn count(&self) -> usize {
        self.index.read().len()
    }

    /// Reads and verifies one record file.
    fn read_record(&self, meta: &RecordMeta) -> Result<AutomatonRecord, StoreError> {
        let path = self.record_path(&meta.id);
        if !path.exists() {
            return Err(StoreError::NotFound(meta.id.clone()));
        }

        let mut file = File::open(&path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let actual = format!("{:08x}", crc32c::crc32c(&data));
        if actual != meta.checksum {
            return Err(StoreError::Corruption(format!(
                "record {} checksum mismatch",
                meta.id
            )));
        }

        let record: AutomatonRecord = serde_json::from_slice(&data)?;
        Ok(record)
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_automaton() -> Automaton {
        Automaton::from_json(&json!({
            "states": [{"id": "A"}, {"id": "B"}],
            "transitions": [
                {"from": "A", "to": "B", "symbol": "0"},
                {"from": "B", "to": "A", "symbol": "1"}
            ],
            "startState": "A",
            "finalStates": ["B"],
            "type": "DFA"
        }))
        .unwrap()
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = AutomatonStore::open(dir.path()).unwrap();

        let automaton = sample_automaton();
        let id = store.save("even-ones", &automaton).unwrap();

        let record = store.load(&id).unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.name, "even-ones");
        assert_eq!(record.automaton, automaton);
    }

    #[test]
    fn test_load_unknown_id_is_none() {
        let dir = TempDir::new().unwrap();
        let store = AutomatonStore::open(dir.path()).unwrap();

        assert!(store.load("missing").unwrap().is_none());
    }

    #[test]
    fn test_each_save_gets_a_fresh_id() {
        let dir = TempDir::new().unwrap();
        let store = AutomatonStore::open(dir.path()).unwrap();

        let automaton = sample_automaton();
        let first = store.save("same-name", &automaton).unwrap();
        let second = store.save("same-name", &automaton).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = AutomatonStore::open(dir.path()).unwrap();

        let id = store.save("gone", &sample_automaton()).unwrap();
        store.delete(&id).unwrap();
        assert!(store.load(&id).unwrap().is_none());

        // Second delete, and deletes of unknown ids, are no-ops.
        store.delete(&id).unwrap();
        store.delete("never-existed").unwrap();
    }

    #[test]
    fn test_list_is_sorted_by_creation() {
        let dir = TempDir::new().unwrap();
        let store = AutomatonStore::open(dir.path()).unwrap();

        let automaton = sample_automaton();
        for name in ["first", "second", "third"] {
            store.save(name, &automaton).unwrap();
            // Records saved in the same millisecond sort by id; a tiny
            // pause keeps the names in insertion order for the assertion.
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let names: Vec<String> = store.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_index_survives_reopen() {
        let dir = TempDir::new().unwrap();

        let id = {
            let store = AutomatonStore::open(dir.path()).unwrap();
            store.save("persisted", &sample_automaton()).unwrap()
        };

        let reopened = AutomatonStore::open(dir.path()).unwrap();
        let record = reopened.load(&id).unwrap().unwrap();
        assert_eq!(record.name, "persisted");
    }

    #[test]
    fn test_corrupted_record_is_detected() {
        let dir = TempDir::new().unwrap();
        let store = AutomatonStore::open(dir.path()).unwrap();

        let id = store.save("tampered", &sample_automaton()).unwrap();

        // Flip a byte in the record file behind the store's back.
        let path = dir.path().join(format!("{id}.json"));
        let mut data = fs::read(&path).unwrap();
        let last = data.len() - 1;
        data[last] = data[last].wrapping_add(1);
        fs::write(&path, data).unwrap();

        assert!(matches!(
            store.load(&id),
            Err(StoreError::Corruption(_))
        ));
    }

    #[test]
    fn test_missing_record_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = AutomatonStore::open(dir.path()).unwrap();

        let id = store.save("vanished", &sample_automaton()).unwrap();
        fs::remove_file(dir.path().join(format!("{id}.json"))).unwrap();

        assert!(matches!(store.load(&id), Err(StoreError::NotFound(_))));
    }
}
