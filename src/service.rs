use crate::liveness::LivenessEvaluator;
use crate::parser::{self, DecodeError};
use crate::registry::AircraftRegistry;
use crate::store::{AircraftRepository, PositionStore, StoreError};
use crate::types::{NewPosition, PositionRecord};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum IngestError {
    #[error("rejected payload: {0}")]
    Decode(#[from] DecodeError),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

/// Ties the decoder, the aircraft registry and the position store together.
pub struct IngestionService {
    registry: AircraftRegistry,
    positions: std::sync::Arc<dyn PositionStore>,
    liveness: LivenessEvaluator,
    aircraft_seen_gap: chrono::TimeDelta,
}

impl IngestionService {
    #[must_use]
    pub fn new(
        aircraft_seen_gap: chrono::TimeDelta,
        aircraft: std::sync::Arc<dyn AircraftRepository>,
        positions: std::sync::Arc<dyn PositionStore>,
    ) -> Self {
        IngestionService {
            registry: AircraftRegistry::new(aircraft),
            liveness: LivenessEvaluator::new(positions.clone()),
            positions,
            aircraft_seen_gap,
        }
    }

    pub async fn ingest(&self, raw: &[u8]) -> Result<(), IngestError> {
        self.ingest_at(raw, chrono::Utc::now()).await
    }

    /// Decodes `raw` and stores it as reported at `time`. Nothing is stored if decoding fails.
    pub async fn ingest_at(
        &self,
        raw: &[u8],
        time: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), IngestError> {
        let decoded = parser::decode(raw)?;
        let aircraft = self.registry.resolve(&decoded.aircraft).await?;
        let id = self
            .positions
            .append(NewPosition {
                time: Some(time),
                aircraft,
                report: decoded.report,
            })
            .await?;
        log::debug!("Stored position {id} for {}", decoded.aircraft);
        Ok(())
    }

    pub async fn query_active(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<PositionRecord>, StoreError> {
        self.liveness
            .currently_active(now, self.aircraft_seen_gap)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::{IngestError, IngestionService};
    use crate::parser::DecodeError;
    use crate::store::{InMemoryStore, SqliteStore};
    use crate::types::AircraftKey;

    const VALID_PAYLOAD: &[u8] = b"1\nC172\nN12345\n37.6213\n-122.3790\n1000\n270\n50\n52\n0\n";

    fn setup() -> (InMemoryStore, IngestionService) {
        let store = InMemoryStore::new();
        let service = IngestionService::new(
            chrono::TimeDelta::seconds(30),
            std::sync::Arc::new(store.clone()),
            std::sync::Arc::new(store.clone()),
        );
        (store, service)
    }

    #[tokio::test]
    async fn when_ingesting_valid_payload_then_it_is_the_active_position() {
        let (_, service) = setup();

        service.ingest(VALID_PAYLOAD).await.expect("payload should be ingested");

        let active = service
            .query_active(chrono::Utc::now())
            .await
            .unwrap()
            .expect("position should be live");
        assert_eq!(active.aircraft.key(), AircraftKey::new("C172", "N12345"));
        assert_eq!(active.report.latitude, 37.6213);
        assert_eq!(active.report.longitude, -122.379);
        assert_eq!(active.report.altitude, 3280);
        assert_eq!(active.report.track, 270);
        assert_eq!(active.report.ground_speed, 97);
        assert_eq!(active.report.air_speed, 101);
        assert_eq!(active.report.vertical_speed, 0);
    }

    #[tokio::test]
    async fn when_payload_is_rejected_then_nothing_is_stored() {
        let (store, service) = setup();
        let truncated = b"1\nC172\nN12345\n37.6213\n-122.3790\n1000\n270\n50\n52\n0";

        let result = service.ingest(truncated).await;

        assert!(matches!(
            result,
            Err(IngestError::Decode(DecodeError::MalformedPayload(_)))
        ));
        assert_eq!(store.aircraft_count(), Ok(0));
        assert_eq!(store.position_count(), Ok(0));
        assert_eq!(service.query_active(chrono::Utc::now()).await, Ok(None));
    }

    #[tokio::test]
    async fn when_same_aircraft_reports_twice_then_history_is_shared() {
        let (store, service) = setup();
        let now = chrono::Utc::now();

        service.ingest_at(VALID_PAYLOAD, now - chrono::TimeDelta::seconds(2)).await.unwrap();
        service.ingest_at(VALID_PAYLOAD, now - chrono::TimeDelta::seconds(1)).await.unwrap();

        assert_eq!(store.aircraft_count(), Ok(1));
        assert_eq!(store.position_count(), Ok(2));
        let active = service.query_active(now).await.unwrap().expect("position should be live");
        assert_eq!(active.time, now - chrono::TimeDelta::seconds(1));
    }

    #[tokio::test]
    async fn when_last_report_is_older_than_gap_then_nothing_is_active() {
        let (_, service) = setup();
        let now = chrono::Utc::now();

        service.ingest_at(VALID_PAYLOAD, now - chrono::TimeDelta::seconds(31)).await.unwrap();

        assert_eq!(service.query_active(now).await, Ok(None));
    }

    #[tokio::test]
    async fn when_backed_by_sqlite_then_ingested_payload_is_live() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let service = IngestionService::new(
            chrono::TimeDelta::seconds(30),
            std::sync::Arc::new(store.clone()),
            std::sync::Arc::new(store.clone()),
        );

        service.ingest(VALID_PAYLOAD).await.expect("payload should be ingested");
        service.ingest(VALID_PAYLOAD).await.expect("payload should be ingested");

        assert_eq!(store.aircraft_count().await, Ok(1));
        assert_eq!(store.position_count().await, Ok(2));
        let active = service
            .query_active(chrono::Utc::now())
            .await
            .unwrap()
            .expect("position should be live");
        assert_eq!(active.aircraft.key(), AircraftKey::new("C172", "N12345"));
        assert_eq!(active.report.altitude, 3280);
        assert_eq!(active.report.ground_speed, 97);
    }
}
