//! Derived statistics for the heatmap and species views.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::sighting::{local_day, Sighting};

/// Activity level of one calendar day, used to color a heatmap cell.
/// Fixed five-band step function over the day's sighting count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    Empty,
    Low,
    Medium,
    High,
    Highest,
}

impl Intensity {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Intensity::Empty,
            1 => Intensity::Low,
            2..=3 => Intensity::Medium,
            4..=6 => Intensity::High,
            _ => Intensity::Highest,
        }
    }
}

/// Collection-wide statistics shown above the heatmap.
#[derive(Debug, Clone, Default)]
pub struct SightingStats {
    pub total: usize,
    pub unique_species: usize,
    pub active_days: usize,
    /// The day with the most sightings, with its count.
    pub best_day: Option<(NaiveDate, usize)>,
}

/// Count sightings per local calendar day; undated records are skipped.
pub fn daily_counts(sightings: &[Sighting]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for sighting in sightings {
        if let Some(day) = local_day(sighting) {
            *counts.entry(day).or_insert(0) += 1;
        }
    }
    counts
}

pub fn compute(sightings: &[Sighting]) -> SightingStats {
    let species: BTreeSet<&str> = sightings
        .iter()
        .map(|s| s.species.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let counts = daily_counts(sightings);
    let best_day = counts
        .iter()
        .max_by_key(|&(day, count)| (*count, *day))
        .map(|(day, count)| (*day, *count));

    SightingStats {
        total: sightings.len(),
        unique_species: species.len(),
        active_days: counts.len(),
        best_day,
    }
}

/// Distinct non-empty species names, sorted, e.g. for a filter list.
pub fn unique_species(sightings: &[Sighting]) -> Vec<String> {
    let set: BTreeSet<String> = sightings
        .iter()
        .map(|s| s.species.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    set.into_iter().collect()
}

/// Per-species derived statistics for the species detail view.
#[derive(Debug, Clone, Default)]
pub struct SpeciesSummary {
    pub total: usize,
    pub first_seen: Option<NaiveDate>,
    pub last_seen: Option<NaiveDate>,
    /// Distinct coordinate pairs, rounded to four decimals.
    pub unique_locations: usize,
}

pub fn species_summary(sightings: &[Sighting], species: &str) -> SpeciesSummary {
    let name = species.to_lowercase();
    let matching: Vec<&Sighting> = sightings
        .iter()
        .filter(|s| s.species.to_lowercase() == name)
        .collect();

    let days: Vec<NaiveDate> = matching.iter().filter_map(|s| local_day(s)).collect();
    let locations: BTreeSet<String> = matching
        .iter()
        .filter_map(|s| match (s.latitude, s.longitude) {
            (Some(lat), Some(lon)) => Some(format!("{lat:.4},{lon:.4}")),
            _ => None,
        })
        .collect();

    SpeciesSummary {
        total: matching.len(),
        first_seen: days.iter().min().copied(),
        last_seen: days.iter().max().copied(),
        unique_locations: locations.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(species: &str, datetime: &str) -> Sighting {
        Sighting {
            id: 0,
            file_path: "photo.jpg".to_string(),
            species: species.to_string(),
            datetime: datetime.to_string(),
            latitude: None,
            longitude: None,
            notes: String::new(),
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_intensity_banding() {
        let expected = [
            (0, Intensity::Empty),
            (1, Intensity::Low),
            (2, Intensity::Medium),
            (3, Intensity::Medium),
            (4, Intensity::High),
            (6, Intensity::High),
            (7, Intensity::Highest),
        ];
        for (count, band) in expected {
            assert_eq!(Intensity::from_count(count), band, "count {count}");
        }
    }

    #[test]
    fn test_stats_counts_species_days_and_best_day() {
        let sightings = vec![
            sighting("American Robin", "2024-01-15T08:00:00"),
            sighting("Northern Cardinal", "2024-01-15T10:00:00"),
            sighting("American Robin", "2024-01-16T09:00:00"),
            sighting("", "2024-01-16T11:00:00"),
            sighting("Blue Jay", ""),
        ];

        let stats = compute(&sightings);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.unique_species, 3);
        assert_eq!(stats.active_days, 2);
        assert_eq!(
            stats.best_day,
            NaiveDate::from_ymd_opt(2024, 1, 16).map(|d| (d, 2))
        );
    }

    #[test]
    fn test_daily_counts_skip_undated_records() {
        let sightings = vec![
            sighting("Wren", "2024-06-01T06:00:00"),
            sighting("Wren", ""),
        ];
        let counts = daily_counts(&sightings);
        assert_eq!(counts.len(), 1);
        assert_eq!(
            counts.get(&NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            Some(&1)
        );
    }

    #[test]
    fn test_unique_species_sorted_and_trimmed() {
        let sightings = vec![
            sighting("Wren", ""),
            sighting("  Wren  ", ""),
            sighting("Blue Jay", ""),
            sighting("", ""),
        ];
        assert_eq!(unique_species(&sightings), vec!["Blue Jay", "Wren"]);
    }

    #[test]
    fn test_species_summary() {
        let mut first = sighting("Northern Cardinal", "2024-01-10T08:00:00");
        first.latitude = Some(40.7589);
        first.longitude = Some(-73.9851);
        let mut second = sighting("northern cardinal", "2024-03-02T07:15:00");
        second.latitude = Some(40.7589);
        second.longitude = Some(-73.9851);
        let other = sighting("Blue Jay", "2024-02-01T12:00:00");

        let summary = species_summary(&[first, second, other], "Northern Cardinal");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.first_seen, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(summary.last_seen, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(summary.unique_locations, 1);
    }
}
