//! Free-text search and field-level filtering.

use chrono::NaiveDate;

use crate::sighting::{parse_datetime, Sighting};

/// Field-level filters. All active filters combine with logical AND;
/// empty strings and `false` flags mean "not filtering on this field".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    /// Substring match on the species name.
    pub species: String,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub date_from: String,
    /// Inclusive upper bound, `YYYY-MM-DD`, extended to end of day so a
    /// same-day sighting at any hour still matches.
    pub date_to: String,
    /// Substring over notes or the stringified coordinates.
    pub location: String,
    /// Require both coordinates to be present.
    pub has_coordinates: bool,
    /// Require notes that are non-empty after trimming.
    pub has_notes: bool,
}

impl Filters {
    pub fn is_active(&self) -> bool {
        !self.species.is_empty()
            || !self.date_from.is_empty()
            || !self.date_to.is_empty()
            || !self.location.is_empty()
            || self.has_coordinates
            || self.has_notes
    }

    pub fn clear(&mut self) {
        *self = Filters::default();
    }
}

/// Whether one sighting passes the free-text term and every active filter.
pub fn matches(sighting: &Sighting, term: &str, filters: &Filters) -> bool {
    matches_term(sighting, term)
        && matches_species(sighting, &filters.species)
        && matches_date_range(sighting, &filters.date_from, &filters.date_to)
        && matches_location(sighting, &filters.location)
        && (!filters.has_coordinates
            || (sighting.latitude.is_some() && sighting.longitude.is_some()))
        && (!filters.has_notes || !sighting.notes.trim().is_empty())
}

/// Filter a collection down to the records matching the term and filters.
pub fn apply(sightings: &[Sighting], term: &str, filters: &Filters) -> Vec<Sighting> {
    if term.trim().is_empty() && !filters.is_active() {
        return sightings.to_vec();
    }
    sightings
        .iter()
        .filter(|s| matches(s, term, filters))
        .cloned()
        .collect()
}

/// Case-insensitive substring search across species, notes, and file
/// path; a record matches if ANY field contains the term.
fn matches_term(sighting: &Sighting, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    sighting.species.to_lowercase().contains(&term)
        || sighting.notes.to_lowercase().contains(&term)
        || sighting.file_path.to_lowercase().contains(&term)
}

fn matches_species(sighting: &Sighting, species: &str) -> bool {
    if species.is_empty() {
        return true;
    }
    sighting
        .species
        .to_lowercase()
        .contains(&species.to_lowercase())
}

fn matches_date_range(sighting: &Sighting, from: &str, to: &str) -> bool {
    let from = parse_filter_date(from);
    let to = parse_filter_date(to);
    if from.is_none() && to.is_none() {
        return true;
    }

    // A record without a usable date cannot fall inside any range.
    let Some(day) = parse_datetime(&sighting.datetime).map(|dt| dt.date()) else {
        return false;
    };

    if let Some(from) = from {
        if day < from {
            return false;
        }
    }
    if let Some(to) = to {
        // Comparing calendar days gives the end-of-day extension: a
        // 23:59 sighting on the bound date still matches.
        if day > to {
            return false;
        }
    }
    true
}

fn parse_filter_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn matches_location(sighting: &Sighting, location: &str) -> bool {
    if location.is_empty() {
        return true;
    }
    let needle = location.to_lowercase();
    if sighting.notes.to_lowercase().contains(&needle) {
        return true;
    }
    let lat_matches = sighting
        .latitude
        .map(|v| v.to_string().contains(location))
        .unwrap_or(false);
    let lon_matches = sighting
        .longitude
        .map(|v| v.to_string().contains(location))
        .unwrap_or(false);
    lat_matches || lon_matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(species: &str, notes: &str) -> Sighting {
        Sighting {
            id: 1,
            file_path: "photo.jpg".to_string(),
            species: species.to_string(),
            datetime: String::new(),
            latitude: None,
            longitude: None,
            notes: notes.to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_term_is_case_insensitive_and_or_combined() {
        let s = sighting("Northern Cardinal", "");
        let none = Filters::default();

        assert!(matches(&s, "cardinal", &none));
        assert!(matches(&s, "CARDINAL", &none));
        assert!(!matches(&s, "robin", &none));
    }

    #[test]
    fn test_term_searches_file_path_too() {
        let mut s = sighting("", "");
        s.file_path = "backyard/Cardinal-0231.JPG".to_string();
        assert!(matches(&s, "cardinal-0231", &Filters::default()));
    }

    #[test]
    fn test_blank_term_matches_everything() {
        let s = sighting("", "");
        assert!(matches(&s, "", &Filters::default()));
        assert!(matches(&s, "   ", &Filters::default()));
    }

    #[test]
    fn test_date_to_is_extended_to_end_of_day() {
        let mut s = sighting("Barn Owl", "");
        let filters = Filters {
            date_to: "2024-01-15".to_string(),
            ..Default::default()
        };

        s.datetime = "2024-01-15T23:59:00".to_string();
        assert!(matches(&s, "", &filters));

        s.datetime = "2024-01-16T00:01:00".to_string();
        assert!(!matches(&s, "", &filters));
    }

    #[test]
    fn test_date_from_is_inclusive() {
        let mut s = sighting("Barn Owl", "");
        let filters = Filters {
            date_from: "2024-01-15".to_string(),
            ..Default::default()
        };

        s.datetime = "2024-01-15T00:00:00".to_string();
        assert!(matches(&s, "", &filters));
        s.datetime = "2024-01-14T23:59:00".to_string();
        assert!(!matches(&s, "", &filters));
    }

    #[test]
    fn test_undated_records_fail_any_date_range() {
        let s = sighting("Barn Owl", "");
        let filters = Filters {
            date_from: "2000-01-01".to_string(),
            ..Default::default()
        };
        assert!(!matches(&s, "", &filters));
    }

    #[test]
    fn test_has_coordinates_requires_both() {
        let mut s = sighting("Sanderling", "");
        let filters = Filters {
            has_coordinates: true,
            ..Default::default()
        };

        assert!(!matches(&s, "", &filters));
        s.latitude = Some(40.0);
        assert!(!matches(&s, "", &filters));
        s.longitude = Some(-74.0);
        assert!(matches(&s, "", &filters));
    }

    #[test]
    fn test_zero_coordinates_still_count_as_present() {
        let mut s = sighting("Gull", "");
        s.latitude = Some(0.0);
        s.longitude = Some(0.0);
        let filters = Filters {
            has_coordinates: true,
            ..Default::default()
        };
        assert!(matches(&s, "", &filters));
    }

    #[test]
    fn test_has_notes_ignores_whitespace_only() {
        let filters = Filters {
            has_notes: true,
            ..Default::default()
        };
        assert!(!matches(&sighting("Wren", "   "), "", &filters));
        assert!(matches(&sighting("Wren", "singing"), "", &filters));
    }

    #[test]
    fn test_location_matches_notes_or_coordinates() {
        let mut s = sighting("Heron", "Seen at Jamaica Bay");
        s.latitude = Some(40.6158);
        s.longitude = Some(-73.8257);

        let by_notes = Filters {
            location: "jamaica".to_string(),
            ..Default::default()
        };
        assert!(matches(&s, "", &by_notes));

        let by_coords = Filters {
            location: "40.61".to_string(),
            ..Default::default()
        };
        assert!(matches(&s, "", &by_coords));

        let elsewhere = Filters {
            location: "central park".to_string(),
            ..Default::default()
        };
        assert!(!matches(&s, "", &elsewhere));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let mut s = sighting("Northern Cardinal", "at the feeder");
        s.datetime = "2024-01-15T10:00:00".to_string();

        let filters = Filters {
            species: "cardinal".to_string(),
            date_from: "2024-01-01".to_string(),
            has_notes: true,
            ..Default::default()
        };
        assert!(matches(&s, "feeder", &filters));

        let conflicting = Filters {
            species: "cardinal".to_string(),
            date_from: "2024-02-01".to_string(),
            ..Default::default()
        };
        assert!(!matches(&s, "feeder", &conflicting));
    }

    #[test]
    fn test_apply_without_term_or_filters_returns_all() {
        let all = vec![sighting("A", ""), sighting("B", "")];
        assert_eq!(apply(&all, "", &Filters::default()).len(), 2);
    }
}
