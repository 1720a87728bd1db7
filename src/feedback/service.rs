//! Feedback submission and the dashboard view.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::feedback::aggregator::{AggregateStats, FeedbackAggregator};
use crate::feedback::record::{FeedbackRecord, NewFeedback};
use crate::feedback::store::FeedbackStore;
use crate::model::inference::InferenceService;

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub stats: AggregateStats,
    /// Newest first.
    pub reviews: Vec<FeedbackRecord>,
}

/// Labels incoming comments and records them.
#[derive(Debug, Clone)]
pub struct FeedbackService {
    inference: InferenceService,
    store: Arc<dyn FeedbackStore>,
}

impl FeedbackService {
    pub fn new(inference: InferenceService, store: Arc<dyn FeedbackStore>) -> Self {
        FeedbackService { inference, store }
    }

    /// Label `comment` and append it to the store.
    ///
    /// Inference cannot fail this call; only storage errors are returned.
    pub fn submit(&self, username: &str, comment: &str, rating: i64) -> Result<FeedbackRecord> {
        let sentiment = self.inference.predict(comment);
        let record = self.store.append(NewFeedback {
            username: username.to_string(),
            comment: comment.to_string(),
            rating,
            sentiment,
        })?;
        info!(id = record.id, sentiment = %record.sentiment, "recorded feedback");
        Ok(record)
    }

    /// Statistics over every record plus the review list.
    pub fn dashboard(&self) -> Result<Dashboard> {
        let mut reviews = self.store.snapshot()?;
        let stats = FeedbackAggregator::compute(&reviews);
        reviews.reverse();
        Ok(Dashboard { stats, reviews })
    }

    /// Statistics only.
    pub fn stats(&self) -> Result<AggregateStats> {
        Ok(FeedbackAggregator::compute(&self.store.snapshot()?))
    }

    pub fn inference(&self) -> &InferenceService {
        &self.inference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::store::MemoryFeedbackStore;
    use crate::model::inference::DEFAULT_LABEL;

    #[test]
    fn test_degraded_submit_records_neutral() {
        let service = FeedbackService::new(
            InferenceService::new(None),
            Arc::new(MemoryFeedbackStore::new()),
        );

        let record = service.submit("ana", "Loved every minute!", 5).unwrap();
        assert_eq!(record.sentiment, DEFAULT_LABEL);
        assert_eq!(record.id, 1);
    }

    #[test]
    fn test_dashboard_lists_newest_first() {
        let service = FeedbackService::new(
            InferenceService::new(None),
            Arc::new(MemoryFeedbackStore::new()),
        );
        service.submit("ana", "ok", 5).unwrap();
        service.submit("bo", "meh", 2).unwrap();

        let dashboard = service.dashboard().unwrap();
        assert_eq!(dashboard.stats.total_count, 2);
        assert_eq!(dashboard.stats.average_rating, 3.5);
        assert_eq!(dashboard.stats.dominant_sentiment, "Neutral");
        assert_eq!(dashboard.reviews[0].username, "bo");
        assert_eq!(dashboard.reviews[1].username, "ana");
    }

    #[test]
    fn test_empty_dashboard() {
        let service = FeedbackService::new(
            InferenceService::new(None),
            Arc::new(MemoryFeedbackStore::new()),
        );
        let dashboard = service.dashboard().unwrap();
        assert_eq!(dashboard.stats, AggregateStats::default());
        assert!(dashboard.reviews.is_empty());
    }
}
