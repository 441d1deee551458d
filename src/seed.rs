//! Demo data seeding.
//!
//! A fresh fallback store showing an empty journal is a poor first
//! impression, so a small fixture set can be inserted on request. This
//! is strictly opt-in (`--seed-demo`); no read path ever seeds
//! implicitly.

use chrono::{Duration, Local, NaiveTime};
use tracing::info;

use crate::db::{Database, StoreError};
use crate::sighting::SightingInput;

struct DemoSighting {
    file: &'static str,
    species: &'static str,
    days_ago: i64,
    hour: u32,
    latitude: f64,
    longitude: f64,
    notes: &'static str,
}

const DEMO_SIGHTINGS: [DemoSighting; 8] = [
    DemoSighting {
        file: "robin-photo-1.jpg",
        species: "American Robin",
        days_ago: 0,
        hour: 8,
        latitude: 40.7128,
        longitude: -74.0060,
        notes: "Beautiful robin spotted in Central Park this morning. Very active and vocal.",
    },
    DemoSighting {
        file: "cardinal-photo.jpg",
        species: "Northern Cardinal",
        days_ago: 0,
        hour: 10,
        latitude: 40.7589,
        longitude: -73.9851,
        notes: "Bright red male cardinal at the bird feeder.",
    },
    DemoSighting {
        file: "bluejay-photo.jpg",
        species: "Blue Jay",
        days_ago: 1,
        hour: 9,
        latitude: 40.7505,
        longitude: -73.9934,
        notes: "Loud and intelligent Blue Jay caching acorns for winter.",
    },
    DemoSighting {
        file: "sparrow-photo.jpg",
        species: "House Sparrow",
        days_ago: 1,
        hour: 14,
        latitude: 40.7282,
        longitude: -74.0776,
        notes: "Small flock of sparrows feeding on scattered seeds.",
    },
    DemoSighting {
        file: "hawk-photo.jpg",
        species: "Red-tailed Hawk",
        days_ago: 2,
        hour: 11,
        latitude: 40.7831,
        longitude: -73.9712,
        notes: "Magnificent Red-tailed Hawk perched on a tall oak tree, scanning for prey.",
    },
    DemoSighting {
        file: "finch-photo.jpg",
        species: "American Goldfinch",
        days_ago: 3,
        hour: 7,
        latitude: 40.7411,
        longitude: -74.0106,
        notes: "Bright yellow goldfinch feeding on thistle seeds.",
    },
    DemoSighting {
        file: "woodpecker-photo.jpg",
        species: "Downy Woodpecker",
        days_ago: 3,
        hour: 16,
        latitude: 40.7614,
        longitude: -73.9776,
        notes: "Small woodpecker drumming on dead tree branch.",
    },
    DemoSighting {
        file: "crow-photo.jpg",
        species: "American Crow",
        days_ago: 7,
        hour: 12,
        latitude: 40.7320,
        longitude: -74.0052,
        notes: "Intelligent crow observed using tools to extract insects.",
    },
];

/// The fixture set, dated relative to today so the journal and heatmap
/// have recent activity to show.
pub fn demo_sightings() -> Vec<SightingInput> {
    let today = Local::now().date_naive();
    DEMO_SIGHTINGS
        .iter()
        .map(|demo| {
            let day = today - Duration::days(demo.days_ago);
            let time = NaiveTime::from_hms_opt(demo.hour, 0, 0).unwrap_or(NaiveTime::MIN);
            SightingInput {
                file_path: demo.file.to_string(),
                species: demo.species.to_string(),
                datetime: day.and_time(time).format("%Y-%m-%dT%H:%M:%S").to_string(),
                latitude: Some(demo.latitude),
                longitude: Some(demo.longitude),
                notes: demo.notes.to_string(),
            }
        })
        .collect()
}

/// Insert the fixtures into an empty store. Does nothing when any record
/// already exists; returns the number of records inserted.
pub fn seed_if_empty(db: &Database) -> Result<usize, StoreError> {
    if !db.get_all_sightings()?.is_empty() {
        info!("store already has sightings, skipping demo seed");
        return Ok(0);
    }
    let fixtures = demo_sightings();
    for input in &fixtures {
        db.insert_sighting(input)?;
    }
    info!(count = fixtures.len(), "seeded demo sightings");
    Ok(fixtures.len())
}
