//! Machine learning components of the emotion classifier.
//!
//! - [`tfidf`]: a single-analyzer TF-IDF vectorizer
//! - [`features`]: sparse vectors and the joint word + character extractor
//! - [`classifier`]: multinomial logistic regression with class weighting

pub mod classifier;
pub mod features;
pub mod tfidf;

pub use classifier::{ClassWeight, ClassifierConfig, LogisticRegression, Prediction, TrainingStats};
pub use features::{FeatureExtractor, FeatureExtractorState, FeatureVector};
pub use tfidf::{AnalyzerKind, TfIdfState, TfIdfVectorizer, VectorizerConfig};
