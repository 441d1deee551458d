pub mod kv;
mod schema;
pub mod sqlite;

use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{BackendKind, DatabaseConfig};
use crate::sighting::{Sighting, SightingInput};

/// Errors crossing the storage boundary. Callers see these instead of
/// raw engine errors; not-found outcomes are not errors (they surface as
/// `None` or zero change counts).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How many times the resolver probes the SQL engine before committing
/// to the fallback store, and how long it waits between probes.
const DETECT_ATTEMPTS: u32 = 6;
const DETECT_INTERVAL: Duration = Duration::from_millis(500);

/// Macro to dispatch a method call to the active backend variant.
macro_rules! dispatch {
    ($self:expr, $method:ident($($arg:expr),* $(,)?)) => {
        match &$self.inner {
            DatabaseInner::Sqlite(db) => db.$method($($arg),*),
            DatabaseInner::Kv(store) => store.$method($($arg),*),
        }
    };
}

enum DatabaseInner {
    Sqlite(sqlite::SqliteDb),
    Kv(kv::KvStore),
}

/// The logical storage interface every view consumes.
///
/// Constructed once at startup by [`Database::resolve`] and passed down
/// to consumers; the backend decision is never revisited during a
/// session.
pub struct Database {
    inner: DatabaseInner,
}

impl Database {
    /// Decide which backend answers for this process.
    ///
    /// With `backend = "auto"` the SQL engine is probed a bounded number
    /// of times (it may become reachable shortly after launch, e.g. a
    /// data directory still being mounted); after the last failed probe
    /// the session commits to the fallback store. Explicit `sqlite` or
    /// `json` settings skip the probe loop.
    pub fn resolve(config: &DatabaseConfig) -> Result<Self, StoreError> {
        match config.backend {
            BackendKind::Sqlite => {
                let db = sqlite::SqliteDb::open(&config.sqlite_path)?;
                Ok(Self {
                    inner: DatabaseInner::Sqlite(db),
                })
            }
            BackendKind::Json => Self::open_fallback(config),
            BackendKind::Auto => {
                for attempt in 1..=DETECT_ATTEMPTS {
                    match sqlite::SqliteDb::open(&config.sqlite_path) {
                        Ok(db) => {
                            info!(path = %config.sqlite_path.display(), "using sqlite backend");
                            return Ok(Self {
                                inner: DatabaseInner::Sqlite(db),
                            });
                        }
                        Err(e) => {
                            warn!(attempt, error = %e, "sqlite backend not reachable");
                            if attempt < DETECT_ATTEMPTS {
                                std::thread::sleep(DETECT_INTERVAL);
                            }
                        }
                    }
                }
                info!("falling back to JSON store for this session");
                Self::open_fallback(config)
            }
        }
    }

    fn open_fallback(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let store = kv::KvStore::open(&config.json_path)?;
        Ok(Self {
            inner: DatabaseInner::Kv(store),
        })
    }

    /// Backend label for the status bar.
    pub fn backend_name(&self) -> &'static str {
        match &self.inner {
            DatabaseInner::Sqlite(_) => "sqlite",
            DatabaseInner::Kv(_) => "json",
        }
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        dispatch!(self, initialize())
    }

    pub fn insert_sighting(&self, input: &SightingInput) -> Result<i64, StoreError> {
        dispatch!(self, insert(input))
    }

    pub fn get_all_sightings(&self) -> Result<Vec<Sighting>, StoreError> {
        dispatch!(self, get_all())
    }

    pub fn get_sighting_by_id(&self, id: i64) -> Result<Option<Sighting>, StoreError> {
        dispatch!(self, get_by_id(id))
    }

    pub fn update_sighting(&self, id: i64, input: &SightingInput) -> Result<usize, StoreError> {
        dispatch!(self, update(id, input))
    }

    pub fn delete_sighting(&self, id: i64) -> Result<usize, StoreError> {
        dispatch!(self, delete(id))
    }

    pub fn search_sightings(&self, term: &str) -> Result<Vec<Sighting>, StoreError> {
        dispatch!(self, search(term))
    }
}
