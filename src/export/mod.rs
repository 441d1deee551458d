//! Export sightings to CSV or JSON files.

use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::db::Database;
use crate::sighting::Sighting;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Pick a format from the output file extension; CSV when in doubt.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// Export every sighting to `output_path`, returning the record count.
pub fn export_sightings(db: &Database, output_path: &Path, format: ExportFormat) -> Result<usize> {
    let sightings = db.get_all_sightings()?;
    write_sightings(&sightings, output_path, format)?;
    Ok(sightings.len())
}

pub fn write_sightings(
    sightings: &[Sighting],
    output_path: &Path,
    format: ExportFormat,
) -> Result<()> {
    match format {
        ExportFormat::Json => export_json(sightings, output_path),
        ExportFormat::Csv => export_csv(sightings, output_path),
    }
}

fn export_json(sightings: &[Sighting], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(sightings)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

fn export_csv(sightings: &[Sighting], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "id",
        "file_path",
        "species",
        "datetime",
        "latitude",
        "longitude",
        "notes",
        "created_at",
        "updated_at",
    ])?;

    for sighting in sightings {
        wtr.write_record([
            &sighting.id.to_string(),
            &sighting.file_path,
            &sighting.species,
            &sighting.datetime,
            &sighting.latitude.map(|v| v.to_string()).unwrap_or_default(),
            &sighting.longitude.map(|v| v.to_string()).unwrap_or_default(),
            &sighting.notes,
            &sighting.created_at,
            &sighting.updated_at,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
