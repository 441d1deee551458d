//! Photo import: discover image files and prefill sighting inputs from
//! their EXIF metadata.

use anyhow::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::sighting::SightingInput;

/// The subset of EXIF metadata a sighting can be prefilled from.
#[derive(Debug, Clone, Default)]
pub struct PhotoExif {
    pub taken_at: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Recursively collect image files under `directory` whose extension is
/// in `extensions` (compared case-insensitively).
pub fn discover_images(directory: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(directory).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let matched = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let lower = e.to_lowercase();
                extensions.iter().any(|known| known == &lower)
            })
            .unwrap_or(false);
        if matched {
            images.push(path.to_path_buf());
        }
    }
    images.sort();
    Ok(images)
}

/// Read the EXIF fields of one photo. A file without readable EXIF data
/// yields an empty result rather than an error; the sighting just starts
/// without a prefilled datetime or location.
pub fn extract_exif(path: &Path) -> PhotoExif {
    let mut meta = PhotoExif::default();

    let Ok(file) = File::open(path) else {
        return meta;
    };
    let mut reader = BufReader::new(file);
    let Ok(exif) = exif::Reader::new().read_from_container(&mut reader) else {
        debug!(path = %path.display(), "no EXIF container");
        return meta;
    };

    if let Some(field) = exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY) {
        let raw = field.display_value().to_string();
        meta.taken_at = exif_datetime_to_iso(raw.trim_matches('"'));
    }

    if let (Some(lat_field), Some(lat_ref), Some(lon_field), Some(lon_ref)) = (
        exif.get_field(exif::Tag::GPSLatitude, exif::In::PRIMARY),
        exif.get_field(exif::Tag::GPSLatitudeRef, exif::In::PRIMARY),
        exif.get_field(exif::Tag::GPSLongitude, exif::In::PRIMARY),
        exif.get_field(exif::Tag::GPSLongitudeRef, exif::In::PRIMARY),
    ) {
        if let (exif::Value::Rational(lat_vals), exif::Value::Rational(lon_vals)) =
            (&lat_field.value, &lon_field.value)
        {
            if lat_vals.len() >= 3 && lon_vals.len() >= 3 {
                let lat = dms_to_decimal(
                    lat_vals[0].num as f64 / lat_vals[0].denom as f64,
                    lat_vals[1].num as f64 / lat_vals[1].denom as f64,
                    lat_vals[2].num as f64 / lat_vals[2].denom as f64,
                );
                let lon = dms_to_decimal(
                    lon_vals[0].num as f64 / lon_vals[0].denom as f64,
                    lon_vals[1].num as f64 / lon_vals[1].denom as f64,
                    lon_vals[2].num as f64 / lon_vals[2].denom as f64,
                );

                let lat_ref = lat_ref.display_value().to_string();
                let lon_ref = lon_ref.display_value().to_string();
                meta.latitude = Some(if lat_ref.contains('S') { -lat } else { lat });
                meta.longitude = Some(if lon_ref.contains('W') { -lon } else { lon });
            }
        }
    }

    meta
}

/// Build a sighting input for one photo, species and notes left for the
/// user to fill in.
pub fn sighting_from_photo(path: &Path) -> SightingInput {
    let exif = extract_exif(path);
    SightingInput {
        file_path: path.to_string_lossy().to_string(),
        datetime: exif.taken_at.unwrap_or_default(),
        latitude: exif.latitude,
        longitude: exif.longitude,
        ..Default::default()
    }
}

/// EXIF stores `2024:01:15 08:30:00`; the record schema wants an ISO-ish
/// `2024-01-15T08:30:00`.
fn exif_datetime_to_iso(raw: &str) -> Option<String> {
    let (date, time) = raw.split_once(' ')?;
    let date = date.replacen(':', "-", 2);
    if date.len() != 10 || time.len() < 8 {
        return None;
    }
    Some(format!("{date}T{time}"))
}

fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}
