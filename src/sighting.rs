//! The sighting record: one bird observation tied to a photo.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A stored sighting as returned by either storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sighting {
    pub id: i64,
    pub file_path: String,
    pub species: String,
    pub datetime: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The editable fields of a sighting, as accepted by insert and update.
///
/// Every field has a type-appropriate empty default so a partially filled
/// form still serializes completely: empty strings, absent coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SightingInput {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub datetime: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl Sighting {
    /// The editable portion of this record, e.g. to prefill an edit form.
    pub fn to_input(&self) -> SightingInput {
        SightingInput {
            file_path: self.file_path.clone(),
            species: self.species.clone(),
            datetime: self.datetime.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            notes: self.notes.clone(),
        }
    }

    /// Sort key shared by both backends: datetime descending with
    /// created_at as tiebreak. String comparison matches the TEXT
    /// collation the relational backend's ORDER BY uses.
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.datetime, &self.created_at)
    }
}

/// Result of validating a [`SightingInput`]. Collects every violated rule
/// so a caller can display the complete list, not just the first failure.
#[derive(Debug, Clone)]
pub struct Validation {
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a sighting input against the record schema rules.
///
/// Rules: `file_path` required and non-empty; `datetime` may be empty but
/// must parse as a date-time otherwise; coordinates may be absent but must
/// be finite and within their hemispheric ranges when present.
pub fn validate(input: &SightingInput) -> Validation {
    let mut errors = Vec::new();

    if input.file_path.is_empty() {
        errors.push("file path is required".to_string());
    }

    if !input.datetime.is_empty() && parse_datetime(&input.datetime).is_none() {
        errors.push("datetime must be a valid date-time".to_string());
    }

    if let Some(lat) = input.latitude {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            errors.push("latitude must be between -90 and 90".to_string());
        }
    }

    if let Some(lon) = input.longitude {
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            errors.push("longitude must be between -180 and 180".to_string());
        }
    }

    Validation { errors }
}

/// Convert a user-entered coordinate string to its numeric form.
///
/// Blank input maps to `None`; anything else is parsed as floating point,
/// with unparseable text also mapping to `None`. Range checking is the
/// validator's job and happens after normalization.
pub fn normalize_coordinate(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parse the datetime formats the record schema accepts.
///
/// RFC 3339 strings are converted to the local wall clock; naive
/// date-times and bare dates are taken as already local. Returns `None`
/// for blank or unparseable input.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    const FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    None
}

/// The local calendar day of a sighting, or `None` when the datetime is
/// missing or unparseable.
pub fn local_day(sighting: &Sighting) -> Option<NaiveDate> {
    parse_datetime(&sighting.datetime).map(|dt| dt.date())
}
