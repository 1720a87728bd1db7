//! In-memory feedback store.

use parking_lot::RwLock;

use crate::error::Result;
use crate::feedback::record::{FeedbackRecord, NewFeedback};
use crate::feedback::store::FeedbackStore;

/// Volatile store backed by a vector.
#[derive(Debug, Default)]
pub struct MemoryFeedbackStore {
    records: RwLock<Vec<FeedbackRecord>>,
}

impl MemoryFeedbackStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedbackStore for MemoryFeedbackStore {
    fn append(&self, feedback: NewFeedback) -> Result<FeedbackRecord> {
        let mut records = self.records.write();
        let record = FeedbackRecord::from_new(records.len() as u64 + 1, feedback);
        records.push(record.clone());
        Ok(record)
    }

    fn snapshot(&self) -> Result<Vec<FeedbackRecord>> {
        Ok(self.records.read().clone())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn feedback(username: &str, rating: i64) -> NewFeedback {
        NewFeedback {
            username: username.to_string(),
            comment: "fine".to_string(),
            rating,
            sentiment: "Joy".to_string(),
        }
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let store = MemoryFeedbackStore::new();
        assert!(store.is_empty().unwrap());

        let first = store.append(feedback("ana", 5)).unwrap();
        let second = store.append(feedback("bo", 3)).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].username, "ana");
        assert_eq!(snapshot[1].username, "bo");
    }

    #[test]
    fn test_concurrent_appends() {
        let store = Arc::new(MemoryFeedbackStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..25 {
                        store.append(feedback(&format!("user{i}"), 4)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 200);
        let ids: Vec<u64> = snapshot.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=200).collect::<Vec<u64>>());
    }
}
