use crate::store::{PositionStore, StoreError};
use crate::types::PositionRecord;

/// Decides whether the latest report still counts as a flight in progress.
///
/// The protocol has no start or end of flight markers. A flight is live for as long as
/// reports keep arriving; once the newest one is older than `gap` it is over. Nothing
/// is stored about this, it is evaluated on every query.
pub struct LivenessEvaluator {
    store: std::sync::Arc<dyn PositionStore>,
}

impl LivenessEvaluator {
    #[must_use]
    pub fn new(store: std::sync::Arc<dyn PositionStore>) -> Self {
        LivenessEvaluator { store }
    }

    pub async fn currently_active(
        &self,
        now: chrono::DateTime<chrono::Utc>,
        gap: chrono::TimeDelta,
    ) -> Result<Option<PositionRecord>, StoreError> {
        self.store.most_recent_since(now - gap).await
    }
}
