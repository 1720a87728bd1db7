//! Append-only feedback storage.
//!
//! Every implementation returns records in insertion order (oldest first).
//! The aggregator's tie-break for the dominant sentiment depends on it.

mod file;
mod memory;

pub use file::FileFeedbackStore;
pub use memory::MemoryFeedbackStore;

use crate::error::Result;
use crate::feedback::record::{FeedbackRecord, NewFeedback};

/// A store of feedback records.
///
/// Appends are serialized; a snapshot taken concurrently with an append
/// either contains the whole new record or none of it.
pub trait FeedbackStore: Send + Sync + std::fmt::Debug {
    /// Persist a submission and return the stored record.
    fn append(&self, feedback: NewFeedback) -> Result<FeedbackRecord>;

    /// All records in insertion order.
    fn snapshot(&self) -> Result<Vec<FeedbackRecord>>;

    /// Number of stored records.
    fn len(&self) -> Result<usize> {
        Ok(self.snapshot()?.len())
    }

    /// Whether the store holds no record.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
