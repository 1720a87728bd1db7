//! Model lifecycle: corpus loading, training, persistence and inference.

pub mod artifact;
pub mod corpus;
pub mod inference;
pub mod pipeline;

pub use artifact::{ArtifactMetadata, ModelArtifact};
pub use corpus::{Corpus, LabeledExample};
pub use inference::{DEFAULT_LABEL, InferenceService};
pub use pipeline::{TrainingPipeline, TrainingReport};
