//! Fallback key-value backend.
//!
//! Used when the embedded SQL engine cannot be reached: the whole
//! collection lives as one serialized JSON array in a single well-known
//! file under the application data directory. Every mutating call is a
//! deserialize, linear scan, reserialize cycle — O(n) per operation,
//! which is acceptable at this backend's expected scale (single-user
//! demo data).

use chrono::Utc;
use rand::Rng;
use std::path::{Path, PathBuf};

use super::StoreError;
use crate::sighting::{Sighting, SightingInput};

pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// No schema to create; kept for interface parity with the SQL
    /// backend so the facade can initialize either one.
    pub fn initialize(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn load(&self) -> Result<Vec<Sighting>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, sightings: &[Sighting]) -> Result<(), StoreError> {
        let json = serde_json::to_string(sightings)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Time-plus-random composite id: unique enough for single-user,
    /// non-concurrent inserts, including several within one millisecond.
    fn next_id() -> i64 {
        let millis = Utc::now().timestamp_millis();
        let jitter = rand::rng().random_range(0..1000i64);
        millis * 1000 + jitter
    }

    fn now() -> String {
        // Matches SQLite's CURRENT_TIMESTAMP format so created_at sort
        // keys collate identically across backends.
        Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn insert(&self, input: &SightingInput) -> Result<i64, StoreError> {
        let mut sightings = self.load()?;
        let now = Self::now();
        let id = Self::next_id();
        sightings.push(Sighting {
            id,
            file_path: input.file_path.clone(),
            species: input.species.clone(),
            datetime: input.datetime.clone(),
            latitude: input.latitude,
            longitude: input.longitude,
            notes: input.notes.clone(),
            created_at: now.clone(),
            updated_at: now,
        });
        self.save(&sightings)?;
        Ok(id)
    }

    pub fn get_all(&self) -> Result<Vec<Sighting>, StoreError> {
        let mut sightings = self.load()?;
        // Same ordering contract as the relational backend.
        sightings.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
        Ok(sightings)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Sighting>, StoreError> {
        Ok(self.load()?.into_iter().find(|s| s.id == id))
    }

    pub fn update(&self, id: i64, input: &SightingInput) -> Result<usize, StoreError> {
        let mut sightings = self.load()?;
        let Some(existing) = sightings.iter_mut().find(|s| s.id == id) else {
            return Ok(0);
        };
        existing.file_path = input.file_path.clone();
        existing.species = input.species.clone();
        existing.datetime = input.datetime.clone();
        existing.latitude = input.latitude;
        existing.longitude = input.longitude;
        existing.notes = input.notes.clone();
        existing.updated_at = Self::now();
        self.save(&sightings)?;
        Ok(1)
    }

    pub fn delete(&self, id: i64) -> Result<usize, StoreError> {
        let mut sightings = self.load()?;
        let before = sightings.len();
        sightings.retain(|s| s.id != id);
        let removed = before - sightings.len();
        if removed > 0 {
            self.save(&sightings)?;
        }
        Ok(removed)
    }

    pub fn search(&self, term: &str) -> Result<Vec<Sighting>, StoreError> {
        let term = term.trim().to_lowercase();
        let mut sightings = self.get_all()?;
        if term.is_empty() {
            return Ok(sightings);
        }
        sightings.retain(|s| {
            s.species.to_lowercase().contains(&term) || s.notes.to_lowercase().contains(&term)
        });
        Ok(sightings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store(dir: &tempfile::TempDir) -> KvStore {
        let store = KvStore::open(&dir.path().join("sightings.json")).unwrap();
        store.initialize().unwrap();
        store
    }

    fn robin() -> SightingInput {
        SightingInput {
            file_path: "robin-photo-1.jpg".to_string(),
            species: "American Robin".to_string(),
            datetime: "2024-01-15T08:00:00".to_string(),
            latitude: Some(40.7128),
            longitude: Some(-74.0060),
            notes: "Very active and vocal this morning.".to_string(),
        }
    }

    #[test]
    fn test_insert_then_get_by_id_round_trips() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let input = robin();
        let id = store.insert(&input).unwrap();

        let stored = store.get_by_id(id).unwrap().expect("record should exist");
        assert_eq!(stored.id, id);
        assert_eq!(stored.to_input(), input);
    }

    #[test]
    fn test_ids_are_distinct_within_a_burst() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let mut ids = Vec::new();
        for _ in 0..20 {
            ids.push(store.insert(&robin()).unwrap());
        }
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_collection_persists_across_reopens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sightings.json");

        let id = {
            let store = KvStore::open(&path).unwrap();
            store.insert(&robin()).unwrap()
        };

        let reopened = KvStore::open(&path).unwrap();
        assert!(reopened.get_by_id(id).unwrap().is_some());
    }

    #[test]
    fn test_get_all_orders_by_datetime_descending() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        // Inserted out of chronological order on purpose.
        for datetime in ["2024-01-10T08:00:00", "2024-03-02T07:15:00", ""] {
            let mut input = robin();
            input.datetime = datetime.to_string();
            store.insert(&input).unwrap();
        }

        let all = store.get_all().unwrap();
        let datetimes: Vec<&str> = all.iter().map(|s| s.datetime.as_str()).collect();
        assert_eq!(
            datetimes,
            vec!["2024-03-02T07:15:00", "2024-01-10T08:00:00", ""]
        );
    }

    #[test]
    fn test_update_missing_id_reports_zero_changes() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        assert_eq!(store.update(12345, &robin()).unwrap(), 0);
    }

    #[test]
    fn test_update_replaces_editable_fields_only() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let id = store.insert(&robin()).unwrap();
        let created_at = store.get_by_id(id).unwrap().unwrap().created_at;

        let mut changed = robin();
        changed.species = "American Goldfinch".to_string();
        changed.latitude = None;
        changed.longitude = None;
        assert_eq!(store.update(id, &changed).unwrap(), 1);

        let stored = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.to_input(), changed);
        assert_eq!(stored.id, id);
        assert_eq!(stored.created_at, created_at);
    }

    #[test]
    fn test_delete_then_get_returns_none() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let id = store.insert(&robin()).unwrap();

        assert_eq!(store.delete(id).unwrap(), 1);
        assert!(store.get_by_id(id).unwrap().is_none());
        assert_eq!(store.delete(id).unwrap(), 0);
    }

    #[test]
    fn test_search_matches_species_or_notes_case_insensitively() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        store.insert(&robin()).unwrap();
        let mut hawk = robin();
        hawk.species = "Red-tailed Hawk".to_string();
        hawk.notes = "Perched on a tall oak, scanning for prey.".to_string();
        store.insert(&hawk).unwrap();

        assert_eq!(store.search("ROBIN").unwrap().len(), 1);
        assert_eq!(store.search("oak").unwrap().len(), 1);
        assert!(store.search("cardinal").unwrap().is_empty());
        assert_eq!(store.search("").unwrap().len(), 2);
    }
}
