//! Dashboard statistics over feedback records.
//!
//! ```
//! use moodlens::feedback::FeedbackAggregator;
//!
//! let records: [(i64, &str); 3] = [(5, "Joy"), (3, "Sad"), (4, "Joy")];
//! let stats = FeedbackAggregator::compute(&records);
//!
//! assert_eq!(stats.total_count, 3);
//! assert_eq!(stats.average_rating, 4.0);
//! assert_eq!(stats.dominant_sentiment, "Joy");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::feedback::record::FeedbackRecord;

/// Dominant sentiment reported when there are no records.
pub const NO_SENTIMENT: &str = "None";

/// Anything carrying a rating and a sentiment label.
pub trait FeedbackSample {
    fn rating(&self) -> i64;
    fn sentiment(&self) -> &str;
}

impl FeedbackSample for FeedbackRecord {
    fn rating(&self) -> i64 {
        self.rating
    }

    fn sentiment(&self) -> &str {
        &self.sentiment
    }
}

impl<S: AsRef<str>> FeedbackSample for (i64, S) {
    fn rating(&self) -> i64 {
        self.0
    }

    fn sentiment(&self) -> &str {
        self.1.as_ref()
    }
}

/// Summary statistics shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_count: usize,
    /// Mean rating rounded to one decimal; `0.0` when empty.
    pub average_rating: f64,
    /// Most frequent sentiment, earliest-seen on ties; [`NO_SENTIMENT`] when empty.
    pub dominant_sentiment: String,
}

impl Default for AggregateStats {
    fn default() -> Self {
        AggregateStats {
            total_count: 0,
            average_rating: 0.0,
            dominant_sentiment: NO_SENTIMENT.to_string(),
        }
    }
}

/// Stateless statistics calculator.
pub struct FeedbackAggregator;

impl FeedbackAggregator {
    /// Compute statistics in a single pass over `records`, in their given order.
    pub fn compute<'a, T, I>(records: I) -> AggregateStats
    where
        T: FeedbackSample + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut total_count = 0usize;
        // Widened so no sequence of i64 ratings can overflow it.
        let mut rating_sum = 0i128;
        // First-seen order, so the earliest sentiment wins a tie.
        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();

        for record in records {
            total_count += 1;
            rating_sum += i128::from(record.rating());
            let sentiment = record.sentiment();
            match slots.get(sentiment) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(sentiment, counts.len());
                    counts.push((sentiment, 1));
                }
            }
        }

        if total_count == 0 {
            return AggregateStats::default();
        }

        let mut dominant = counts[0];
        for &(sentiment, count) in &counts[1..] {
            if count > dominant.1 {
                dominant = (sentiment, count);
            }
        }

        AggregateStats {
            total_count,
            average_rating: round_one_decimal(rating_sum as f64 / total_count as f64),
            dominant_sentiment: dominant.0.to_string(),
        }
    }
}

/// Round on the exact binary value, ties to even.
fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}
