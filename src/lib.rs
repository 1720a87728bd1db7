//! # moodlens
//!
//! Emotion classification for short feedback comments, plus the statistics a
//! feedback dashboard shows.
//!
//! ## Features
//!
//! - Offline training from a labeled CSV corpus
//! - Word 1-2 gram and character 3-5 gram TF-IDF features
//! - Class-balanced multinomial logistic regression
//! - Checksummed single-file model artifact
//! - Inference that degrades to a default label instead of failing
//! - Append-only feedback stores and dashboard aggregation
//!
//! ## Example
//!
//! ```no_run
//! use moodlens::model::{InferenceService, TrainingPipeline};
//!
//! # fn main() -> moodlens::error::Result<()> {
//! TrainingPipeline::default().run("EmotionDetection.csv")?;
//!
//! let service = InferenceService::from_path("emotion_model.bin");
//! println!("{}", service.predict("The staff were wonderful"));
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod ml;
pub mod model;

pub mod prelude {
    pub use crate::analysis::normalizer::TextNormalizer;
    pub use crate::config::TrainingConfig;
    pub use crate::error::{MoodlensError, Result};
    pub use crate::feedback::{
        AggregateStats, FeedbackAggregator, FeedbackRecord, FeedbackService, FeedbackStore,
    };
    pub use crate::ml::{FeatureExtractor, FeatureVector, LogisticRegression, Prediction};
    pub use crate::model::{InferenceService, ModelArtifact, TrainingPipeline};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
