pub const SCHEMA: &str = r#"
-- Sightings table: one bird observation per photo
CREATE TABLE IF NOT EXISTS sightings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_path TEXT NOT NULL,
    species TEXT NOT NULL DEFAULT '',
    datetime TEXT NOT NULL DEFAULT '',
    latitude REAL,
    longitude REAL,
    notes TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- Indexes for list-by-date and search-by-species
CREATE INDEX IF NOT EXISTS idx_sightings_datetime ON sightings(datetime);
CREATE INDEX IF NOT EXISTS idx_sightings_species ON sightings(species);
"#;
