//! Integration tests for feedback submission and dashboard statistics.

use std::sync::Arc;
use std::thread;

use moodlens::error::Result;
use moodlens::feedback::{
    AggregateStats, FeedbackAggregator, FeedbackService, FeedbackStore, FileFeedbackStore,
    MemoryFeedbackStore, NewFeedback,
};
use moodlens::model::InferenceService;
use tempfile::TempDir;

fn labeled(rating: i64, sentiment: &str) -> NewFeedback {
    NewFeedback {
        username: "guest".to_string(),
        comment: format!("rated {rating}"),
        rating,
        sentiment: sentiment.to_string(),
    }
}

#[test]
fn test_dashboard_over_stored_records() -> Result<()> {
    let store = MemoryFeedbackStore::new();
    store.append(labeled(5, "Joy"))?;
    store.append(labeled(3, "Sad"))?;
    store.append(labeled(4, "Joy"))?;

    let stats = FeedbackAggregator::compute(&store.snapshot()?);
    assert_eq!(
        stats,
        AggregateStats {
            total_count: 3,
            average_rating: 4.0,
            dominant_sentiment: "Joy".to_string(),
        }
    );
    Ok(())
}

#[test]
fn test_tie_break_follows_store_order() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("feedback.jsonl");
    {
        let store = FileFeedbackStore::open(&path)?;
        store.append(labeled(1, "Sad"))?;
        store.append(labeled(1, "Joy"))?;
    }

    let store = FileFeedbackStore::open(&path)?;
    let stats = FeedbackAggregator::compute(&store.snapshot()?);
    assert_eq!(stats.dominant_sentiment, "Sad");
    assert_eq!(stats.average_rating, 1.0);
    Ok(())
}

#[test]
fn test_submit_through_file_store() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("feedback.jsonl");
    let store = Arc::new(FileFeedbackStore::open(&path)?);
    let service = FeedbackService::new(InferenceService::new(None), store);

    service.submit("ana", "Wonderful breakfast", 5)?;
    service.submit("bo", "Cold room", 2)?;

    let dashboard = service.dashboard()?;
    assert_eq!(dashboard.stats.total_count, 2);
    assert_eq!(dashboard.stats.average_rating, 3.5);
    assert_eq!(dashboard.stats.dominant_sentiment, "Neutral");
    assert_eq!(dashboard.reviews[0].comment, "Cold room");

    let reopened = FileFeedbackStore::open(&path)?;
    assert_eq!(reopened.len()?, 2);
    Ok(())
}

#[test]
fn test_concurrent_submissions_to_file_store() -> Result<()> {
    let dir = TempDir::new()?;
    let store = Arc::new(FileFeedbackStore::open(dir.path().join("feedback.jsonl"))?);
    let service = FeedbackService::new(InferenceService::new(None), store.clone());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = service.clone();
            thread::spawn(move || -> Result<()> {
                for j in 0..10 {
                    service.submit(&format!("user{i}"), &format!("comment {j}"), 3)?;
                }
                Ok(())
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("submission thread panicked")?;
    }

    let records = store.snapshot()?;
    assert_eq!(records.len(), 40);
    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, (1..=40).collect::<Vec<u64>>());

    let reopened = FileFeedbackStore::open(store.path())?;
    assert_eq!(reopened.snapshot()?, records);
    Ok(())
}

#[test]
fn test_separate_handles_share_one_id_sequence() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("feedback.jsonl");
    FileFeedbackStore::open(&path)?;

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let path = path.clone();
            thread::spawn(move || -> Result<()> {
                let store = FileFeedbackStore::open(&path)?;
                for _ in 0..10 {
                    store.append(labeled(i + 1, "Joy"))?;
                }
                Ok(())
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("append thread panicked")?;
    }

    let reopened = FileFeedbackStore::open(&path)?;
    let ids: Vec<u64> = reopened.snapshot()?.iter().map(|r| r.id).collect();
    assert_eq!(ids, (1..=40).collect::<Vec<u64>>());
    Ok(())
}

#[test]
fn test_empty_store_stats() -> Result<()> {
    let service = FeedbackService::new(
        InferenceService::new(None),
        Arc::new(MemoryFeedbackStore::new()),
    );
    let stats = service.stats()?;
    assert_eq!(stats.total_count, 0);
    assert_eq!(stats.average_rating, 0.0);
    assert_eq!(stats.dominant_sentiment, "None");
    Ok(())
}
