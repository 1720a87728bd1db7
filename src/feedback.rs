//! Feedback records, their storage, and dashboard statistics.

pub mod aggregator;
pub mod record;
pub mod service;
pub mod store;

pub use aggregator::{AggregateStats, FeedbackAggregator, FeedbackSample, NO_SENTIMENT};
pub use record::{FeedbackRecord, NewFeedback};
pub use service::{Dashboard, FeedbackService};
pub use store::{FeedbackStore, FileFeedbackStore, MemoryFeedbackStore};
