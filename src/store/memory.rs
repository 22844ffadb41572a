use super::{AircraftRepository, PositionStore, StoreError};
use crate::types::{Aircraft, AircraftId, AircraftKey, NewPosition, PositionId, PositionRecord};

#[derive(Debug, Default)]
struct Tables {
    aircraft: std::collections::HashMap<AircraftId, Aircraft>,
    aircraft_by_key: std::collections::HashMap<AircraftKey, AircraftId>,
    // kept sorted by time
    positions: std::collections::VecDeque<PositionRecord>,
    next_aircraft_id: i64,
    next_position_id: i64,
}

impl Tables {
    fn insert_ordered(&mut self, record: PositionRecord) {
        // New data is normally the most recent data, so try the back first
        if let Some(last) = self.positions.back() {
            if record.time >= last.time {
                self.positions.push_back(record);
                return;
            }
        }

        // Equal times go after the existing ones so the later append wins
        let idx = self.positions.partition_point(|x| x.time <= record.time);
        self.positions.insert(idx, record);
    }
}

/// Store held in memory and lost on drop. Shareable across request handlers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: std::sync::Arc<std::sync::RwLock<Tables>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    pub fn aircraft_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.aircraft.len())
    }

    pub fn position_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.positions.len())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait::async_trait]
impl AircraftRepository for InMemoryStore {
    async fn find_aircraft(&self, key: &AircraftKey) -> Result<Option<Aircraft>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .aircraft_by_key
            .get(key)
            .and_then(|id| tables.aircraft.get(id))
            .cloned())
    }

    async fn insert_aircraft(&self, key: &AircraftKey) -> Result<Aircraft, StoreError> {
        let mut tables = self.write()?;
        if tables.aircraft_by_key.contains_key(key) {
            return Err(StoreError::DuplicateAircraft(key.clone()));
        }

        tables.next_aircraft_id += 1;
        let id = AircraftId::new(tables.next_aircraft_id);
        let aircraft = Aircraft::new(id, key.clone());
        tables.aircraft_by_key.insert(key.clone(), id);
        tables.aircraft.insert(id, aircraft.clone());
        Ok(aircraft)
    }
}

#[async_trait::async_trait]
impl PositionStore for InMemoryStore {
    async fn append(&self, position: NewPosition) -> Result<PositionId, StoreError> {
        let mut tables = self.write()?;
        let Some(aircraft) = tables.aircraft.get(&position.aircraft.id).cloned() else {
            return Err(StoreError::UnknownAircraft(position.aircraft.id));
        };

        tables.next_position_id += 1;
        let id = PositionId::new(tables.next_position_id);
        tables.insert_ordered(PositionRecord {
            id,
            time: position.time.unwrap_or_else(chrono::Utc::now),
            aircraft,
            report: position.report,
        });
        Ok(id)
    }

    async fn most_recent_since(
        &self,
        instant: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<PositionRecord>, StoreError> {
        Ok(self
            .read()?
            .positions
            .back()
            .filter(|record| record.time >= instant)
            .cloned())
    }

    async fn positions_for(&self, aircraft: &Aircraft) -> Result<Vec<PositionRecord>, StoreError> {
        Ok(self
            .read()?
            .positions
            .iter()
            .filter(|record| record.aircraft.id == aircraft.id)
            .cloned()
            .collect())
    }
}
