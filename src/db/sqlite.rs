//! SQLite backend implementation.

use rusqlite::Connection;
use std::path::Path;

use super::schema::SCHEMA;
use super::StoreError;
use crate::sighting::{Sighting, SightingInput};

pub struct SqliteDb {
    conn: Connection,
}

impl SqliteDb {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// In-memory database for tests.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create the schema if absent. Safe to run on every launch.
    pub fn initialize(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn insert(&self, input: &SightingInput) -> Result<i64, StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO sightings (file_path, species, datetime, latitude, longitude, notes)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            rusqlite::params![
                input.file_path,
                input.species,
                input.datetime,
                input.latitude,
                input.longitude,
                input.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_all(&self) -> Result<Vec<Sighting>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, file_path, species, datetime, latitude, longitude, notes,
                   created_at, updated_at
            FROM sightings
            ORDER BY datetime DESC, created_at DESC
            "#,
        )?;
        let sightings = stmt
            .query_map([], row_to_sighting)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sightings)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Sighting>, StoreError> {
        let result = self.conn.query_row(
            r#"
            SELECT id, file_path, species, datetime, latitude, longitude, notes,
                   created_at, updated_at
            FROM sightings
            WHERE id = ?
            "#,
            [id],
            row_to_sighting,
        );
        match result {
            Ok(sighting) => Ok(Some(sighting)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the editable fields of a record. A missing id is reported
    /// as zero changes, not an error.
    pub fn update(&self, id: i64, input: &SightingInput) -> Result<usize, StoreError> {
        let changes = self.conn.execute(
            r#"
            UPDATE sightings
            SET file_path = ?, species = ?, datetime = ?, latitude = ?, longitude = ?,
                notes = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            rusqlite::params![
                input.file_path,
                input.species,
                input.datetime,
                input.latitude,
                input.longitude,
                input.notes,
                id,
            ],
        )?;
        Ok(changes)
    }

    pub fn delete(&self, id: i64) -> Result<usize, StoreError> {
        let changes = self
            .conn
            .execute("DELETE FROM sightings WHERE id = ?", [id])?;
        Ok(changes)
    }

    /// Case-insensitive substring match over species or notes. A blank
    /// term returns the full set.
    pub fn search(&self, term: &str) -> Result<Vec<Sighting>, StoreError> {
        if term.trim().is_empty() {
            return self.get_all();
        }
        let pattern = format!("%{}%", term.to_lowercase());
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, file_path, species, datetime, latitude, longitude, notes,
                   created_at, updated_at
            FROM sightings
            WHERE LOWER(species) LIKE ?1 OR LOWER(notes) LIKE ?1
            ORDER BY datetime DESC, created_at DESC
            "#,
        )?;
        let sightings = stmt
            .query_map([pattern], row_to_sighting)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sightings)
    }
}

fn row_to_sighting(row: &rusqlite::Row<'_>) -> rusqlite::Result<Sighting> {
    Ok(Sighting {
        id: row.get(0)?,
        file_path: row.get(1)?,
        species: row.get(2)?,
        datetime: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_db() -> SqliteDb {
        let db = SqliteDb::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    fn cardinal() -> SightingInput {
        SightingInput {
            file_path: "cardinal-photo.jpg".to_string(),
            species: "Northern Cardinal".to_string(),
            datetime: "2024-01-15T09:30:00".to_string(),
            latitude: Some(40.7589),
            longitude: Some(-73.9851),
            notes: "Bright red male at the feeder.".to_string(),
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let db = open_db();
        db.initialize().unwrap();
        db.initialize().unwrap();
    }

    #[test]
    fn test_insert_then_get_by_id_round_trips() {
        let db = open_db();
        let input = cardinal();
        let id = db.insert(&input).unwrap();

        let stored = db.get_by_id(id).unwrap().expect("record should exist");
        assert_eq!(stored.id, id);
        assert_eq!(stored.to_input(), input);
        assert!(!stored.created_at.is_empty());
        assert!(!stored.updated_at.is_empty());
    }

    #[test]
    fn test_get_by_id_missing_is_none_not_error() {
        let db = open_db();
        assert!(db.get_by_id(9999).unwrap().is_none());
    }

    #[test]
    fn test_get_all_orders_by_datetime_descending() {
        let db = open_db();
        for datetime in ["2024-01-10T08:00:00", "2024-03-02T07:15:00", "2024-02-20T18:45:00"] {
            let mut input = cardinal();
            input.datetime = datetime.to_string();
            db.insert(&input).unwrap();
        }
        // Undated records settle after dated ones.
        let mut undated = cardinal();
        undated.datetime = String::new();
        db.insert(&undated).unwrap();

        let all = db.get_all().unwrap();
        let datetimes: Vec<&str> = all.iter().map(|s| s.datetime.as_str()).collect();
        assert_eq!(
            datetimes,
            vec!["2024-03-02T07:15:00", "2024-02-20T18:45:00", "2024-01-10T08:00:00", ""]
        );
    }

    #[test]
    fn test_update_is_idempotent_and_counts_rows() {
        let db = open_db();
        let id = db.insert(&cardinal()).unwrap();

        let mut updated = cardinal();
        updated.notes = "Seen again near the maple.".to_string();

        assert_eq!(db.update(id, &updated).unwrap(), 1);
        assert_eq!(db.update(id, &updated).unwrap(), 1);

        let stored = db.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.to_input(), updated);
    }

    #[test]
    fn test_update_missing_id_reports_zero_changes() {
        let db = open_db();
        assert_eq!(db.update(42, &cardinal()).unwrap(), 0);
    }

    #[test]
    fn test_delete_then_get_returns_none() {
        let db = open_db();
        let id = db.insert(&cardinal()).unwrap();

        assert_eq!(db.delete(id).unwrap(), 1);
        assert!(db.get_by_id(id).unwrap().is_none());
        assert_eq!(db.delete(id).unwrap(), 0);
    }

    #[test]
    fn test_search_is_case_insensitive_over_species_or_notes() {
        let db = open_db();
        db.insert(&cardinal()).unwrap();
        let mut jay = cardinal();
        jay.species = "Blue Jay".to_string();
        jay.notes = "Caching acorns for winter.".to_string();
        db.insert(&jay).unwrap();

        assert_eq!(db.search("cardinal").unwrap().len(), 1);
        assert_eq!(db.search("CARDINAL").unwrap().len(), 1);
        assert_eq!(db.search("acorns").unwrap().len(), 1);
        assert!(db.search("robin").unwrap().is_empty());
    }

    #[test]
    fn test_blank_search_term_returns_everything() {
        let db = open_db();
        db.insert(&cardinal()).unwrap();
        db.insert(&cardinal()).unwrap();

        assert_eq!(db.search("").unwrap().len(), 2);
        assert_eq!(db.search("   ").unwrap().len(), 2);
    }
}
