//! Error types for the moodlens library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`MoodlensError`] enum.
//!
//! # Examples
//!
//! ```
//! use moodlens::error::{MoodlensError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(MoodlensError::corpus_load("no text column"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for moodlens operations.
///
/// Training-path variants (`CorpusLoad`, `Training`) are meant to be surfaced
/// to the operator. Inference-path variants (`ArtifactMissing`,
/// `ArtifactCorrupt`, `FeatureExtraction`) are absorbed by
/// [`InferenceService`](crate::model::InferenceService), which falls back to
/// the default label.
#[derive(Error, Debug)]
pub enum MoodlensError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The training corpus could not be read or its columns could not be detected.
    #[error("Corpus load error: {0}")]
    CorpusLoad(String),

    /// No model artifact exists at the expected location.
    #[error("Artifact missing: {0}")]
    ArtifactMissing(String),

    /// A model artifact exists but cannot be decoded.
    #[error("Artifact corrupt: {0}")]
    ArtifactCorrupt(String),

    /// Feature extraction failed for a piece of text.
    #[error("Feature extraction error: {0}")]
    FeatureExtraction(String),

    /// Model fitting failed.
    #[error("Training error: {0}")]
    Training(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Feedback storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Binary (de)serialization errors
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with MoodlensError.
pub type Result<T> = std::result::Result<T, MoodlensError>;

impl MoodlensError {
    /// Create a new corpus load error.
    pub fn corpus_load<S: Into<String>>(msg: S) -> Self {
        MoodlensError::CorpusLoad(msg.into())
    }

    /// Create a new artifact missing error.
    pub fn artifact_missing<S: Into<String>>(msg: S) -> Self {
        MoodlensError::ArtifactMissing(msg.into())
    }

    /// Create a new artifact corrupt error.
    pub fn artifact_corrupt<S: Into<String>>(msg: S) -> Self {
        MoodlensError::ArtifactCorrupt(msg.into())
    }

    /// Create a new feature extraction error.
    pub fn feature_extraction<S: Into<String>>(msg: S) -> Self {
        MoodlensError::FeatureExtraction(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        MoodlensError::Training(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        MoodlensError::Analysis(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        MoodlensError::Storage(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        MoodlensError::InvalidConfig(msg.into())
    }

    /// Whether this error belongs to the artifact loading family.
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            MoodlensError::ArtifactMissing(_) | MoodlensError::ArtifactCorrupt(_)
        )
    }
}
