pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::types::{Aircraft, AircraftId, AircraftKey, NewPosition, PositionId, PositionRecord};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("aircraft {0} already exists")]
    DuplicateAircraft(AircraftKey),

    #[error("aircraft {0} vanished after a duplicate insert")]
    MissingAircraft(AircraftKey),

    #[error("unknown aircraft id {0}")]
    UnknownAircraft(AircraftId),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("database error {0}")]
    Database(String),
}

/// Aircraft table. Implementations enforce uniqueness of the `(icao_type, registration)`
/// pair: inserting an existing key fails with [`StoreError::DuplicateAircraft`].
#[async_trait::async_trait]
pub trait AircraftRepository: Send + Sync {
    async fn find_aircraft(&self, key: &AircraftKey) -> Result<Option<Aircraft>, StoreError>;

    async fn insert_aircraft(&self, key: &AircraftKey) -> Result<Aircraft, StoreError>;
}

/// Append-only position log.
#[async_trait::async_trait]
pub trait PositionStore: Send + Sync {
    async fn append(&self, position: NewPosition) -> Result<PositionId, StoreError>;

    /// The latest record with `time >= instant`, if any. Ties go to the later append.
    async fn most_recent_since(
        &self,
        instant: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<PositionRecord>, StoreError>;

    /// Every record of `aircraft`, oldest first.
    async fn positions_for(&self, aircraft: &Aircraft) -> Result<Vec<PositionRecord>, StoreError>;
}
