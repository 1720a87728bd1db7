//! Feedback record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submission before the store has accepted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub username: String,
    pub comment: String,
    pub rating: i64,
    /// Label assigned by the inference service at write time.
    pub sentiment: String,
}

/// A stored, immutable feedback record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Store-assigned sequence number, starting at 1.
    pub id: u64,
    pub username: String,
    pub comment: String,
    pub rating: i64,
    pub sentiment: String,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Stamp a submission with its id and the current time.
    pub fn from_new(id: u64, feedback: NewFeedback) -> Self {
        FeedbackRecord {
            id,
            username: feedback.username,
            comment: feedback.comment,
            rating: feedback.rating,
            sentiment: feedback.sentiment,
            created_at: Utc::now(),
        }
    }
}
