use crate::store::{AircraftRepository, StoreError};
use crate::types::{Aircraft, AircraftKey};

/// Maps an `(icao_type, registration)` pair to its one registered [`Aircraft`].
pub struct AircraftRegistry {
    repository: std::sync::Arc<dyn AircraftRepository>,
}

impl AircraftRegistry {
    #[must_use]
    pub fn new(repository: std::sync::Arc<dyn AircraftRepository>) -> Self {
        AircraftRegistry { repository }
    }

    /// Returns the registered aircraft for `key`, registering it on first sighting.
    ///
    /// A concurrent first sighting of the same key makes our insert lose against the
    /// repository's uniqueness check. That is not an error: the winner's row is read back.
    pub async fn resolve(&self, key: &AircraftKey) -> Result<Aircraft, StoreError> {
        if let Some(aircraft) = self.repository.find_aircraft(key).await? {
            return Ok(aircraft);
        }

        match self.repository.insert_aircraft(key).await {
            Ok(aircraft) => {
                log::info!("Registered new aircraft {aircraft}");
                Ok(aircraft)
            }
            Err(StoreError::DuplicateAircraft(_)) => {
                log::debug!("Aircraft {key} registered concurrently, reading it back");
                self.repository
                    .find_aircraft(key)
                    .await?
                    .ok_or_else(|| StoreError::MissingAircraft(key.clone()))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AircraftRegistry;
    use crate::store::{AircraftRepository, InMemoryStore, StoreError};
    use crate::types::{Aircraft, AircraftId, AircraftKey};

    // Simulates losing the insert race: the first lookup misses, the insert collides
    // with a row another request just committed.
    struct RacingRepository {
        winner: Aircraft,
        lookups: std::sync::Mutex<usize>,
    }

    #[async_trait::async_trait]
    impl AircraftRepository for RacingRepository {
        async fn find_aircraft(&self, _key: &AircraftKey) -> Result<Option<Aircraft>, StoreError> {
            let mut lookups = self.lookups.lock().unwrap();
            *lookups += 1;
            if *lookups == 1 {
                Ok(None)
            } else {
                Ok(Some(self.winner.clone()))
            }
        }

        async fn insert_aircraft(&self, key: &AircraftKey) -> Result<Aircraft, StoreError> {
            Err(StoreError::DuplicateAircraft(key.clone()))
        }
    }

    struct BrokenRepository;

    #[async_trait::async_trait]
    impl AircraftRepository for BrokenRepository {
        async fn find_aircraft(&self, _key: &AircraftKey) -> Result<Option<Aircraft>, StoreError> {
            Ok(None)
        }

        async fn insert_aircraft(&self, _key: &AircraftKey) -> Result<Aircraft, StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    #[tokio::test]
    async fn when_resolving_same_key_twice_then_same_aircraft_is_returned() {
        let store = InMemoryStore::new();
        let registry = AircraftRegistry::new(std::sync::Arc::new(store.clone()));
        let key = AircraftKey::new("C172", "N12345");

        let first = registry.resolve(&key).await.unwrap();
        let second = registry.resolve(&key).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.aircraft_count(), Ok(1));
    }

    #[tokio::test]
    async fn when_resolving_distinct_keys_then_distinct_aircraft_are_returned() {
        let store = InMemoryStore::new();
        let registry = AircraftRegistry::new(std::sync::Arc::new(store.clone()));

        let cessna = registry.resolve(&AircraftKey::new("C172", "N12345")).await.unwrap();
        let same_type = registry.resolve(&AircraftKey::new("C172", "N54321")).await.unwrap();
        let same_registration = registry.resolve(&AircraftKey::new("PA28", "N12345")).await.unwrap();

        assert_ne!(cessna.id, same_type.id);
        assert_ne!(cessna.id, same_registration.id);
        assert_ne!(same_type.id, same_registration.id);
        assert_eq!(store.aircraft_count(), Ok(3));
    }

    #[tokio::test]
    async fn when_insert_loses_race_then_winner_is_returned() {
        let winner = Aircraft::new(AircraftId::new(9), AircraftKey::new("C172", "N12345"));
        let registry = AircraftRegistry::new(std::sync::Arc::new(RacingRepository {
            winner: winner.clone(),
            lookups: std::sync::Mutex::new(0),
        }));

        assert_eq!(registry.resolve(&winner.key()).await, Ok(winner));
    }

    #[tokio::test]
    async fn when_repository_fails_then_error_is_propagated() {
        let registry = AircraftRegistry::new(std::sync::Arc::new(BrokenRepository));
        assert_eq!(
            registry.resolve(&AircraftKey::new("C172", "N12345")).await,
            Err(StoreError::Poisoned)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn when_resolving_concurrently_then_one_aircraft_is_registered() {
        let store = InMemoryStore::new();
        let registry = std::sync::Arc::new(AircraftRegistry::new(std::sync::Arc::new(
            store.clone(),
        )));
        let key = AircraftKey::new("B738", "EI-ABC");

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let registry = registry.clone();
            let key = key.clone();
            tasks.spawn(async move { registry.resolve(&key).await.unwrap().id });
        }
        let mut ids: Vec<AircraftId> = Vec::new();
        while let Some(id) = tasks.join_next().await {
            ids.push(id.unwrap());
        }

        assert_eq!(ids.len(), 8);
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(store.aircraft_count(), Ok(1));
    }
}
