//! End-to-end training: corpus → fitted artifact → file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::analysis::normalizer::TextNormalizer;
use crate::config::TrainingConfig;
use crate::error::{MoodlensError, Result};
use crate::ml::classifier::{LogisticRegression, TrainingStats};
use crate::ml::features::{FeatureExtractor, FeatureVector};
use crate::model::artifact::{ArtifactMetadata, ModelArtifact};
use crate::model::corpus::Corpus;

/// Summary of a completed training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// Where the artifact was written.
    pub artifact_path: PathBuf,
    /// Rows used for fitting.
    pub rows: usize,
    /// Rows skipped for missing values.
    pub dropped_rows: usize,
    /// Example count per label.
    pub label_counts: BTreeMap<String, usize>,
    /// Word vocabulary size.
    pub word_features: usize,
    /// Character vocabulary size.
    pub char_features: usize,
    /// Optimizer outcome.
    pub training: TrainingStats,
}

/// Offline trainer producing a [`ModelArtifact`].
#[derive(Debug, Clone, Default)]
pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(TrainingPipeline { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Load `corpus_path`, train, and save to the configured artifact path.
    ///
    /// Nothing is written unless every step succeeds.
    pub fn run<P: AsRef<Path>>(&self, corpus_path: P) -> Result<TrainingReport> {
        let corpus = Corpus::from_path(corpus_path)?;
        let artifact = self.train(&corpus)?;
        artifact.save(&self.config.artifact_path)?;

        let metadata = artifact.metadata();
        let mut label_counts = BTreeMap::new();
        for example in corpus.examples() {
            *label_counts.entry(example.label.clone()).or_insert(0) += 1;
        }

        Ok(TrainingReport {
            artifact_path: self.config.artifact_path.clone(),
            rows: metadata.training_rows,
            dropped_rows: corpus.dropped_rows(),
            label_counts,
            word_features: artifact.extractor().word_vocabulary_size(),
            char_features: artifact.extractor().char_vocabulary_size(),
            training: metadata.training.clone(),
        })
    }

    /// Fit a model on an in-memory corpus without touching the filesystem.
    pub fn train(&self, corpus: &Corpus) -> Result<ModelArtifact> {
        if corpus.is_empty() {
            return Err(MoodlensError::corpus_load("corpus has no usable rows"));
        }
        info!(rows = corpus.len(), "training emotion model");

        let normalizer = TextNormalizer::from_config(self.config.normalizer.clone())?;
        let texts: Vec<String> = corpus
            .examples()
            .par_iter()
            .map(|example| normalizer.normalize(&example.text))
            .collect();
        let labels: Vec<String> = corpus
            .examples()
            .iter()
            .map(|example| example.label.clone())
            .collect();

        let mut extractor =
            FeatureExtractor::new(self.config.word.clone(), self.config.char.clone())?;
        extractor.fit(&texts)?;
        info!(
            word_features = extractor.word_vocabulary_size(),
            char_features = extractor.char_vocabulary_size(),
            "fitted feature extractor"
        );

        let features: Vec<FeatureVector> = texts
            .par_iter()
            .map(|text| extractor.try_transform(text))
            .collect::<Result<_>>()?;

        let (classifier, training) =
            LogisticRegression::fit(&features, &labels, &self.config.classifier)?;
        Self::log_outcome(&training);

        let metadata = ArtifactMetadata {
            created_at: Utc::now(),
            library_version: crate::VERSION.to_string(),
            training_rows: corpus.len(),
            labels: classifier.classes().to_vec(),
            training,
        };
        ModelArtifact::new(normalizer, extractor, classifier, metadata)
    }

    fn log_outcome(training: &TrainingStats) {
        if training.converged {
            info!(
                iterations = training.iterations,
                "model trained successfully"
            );
        } else {
            info!(
                iterations = training.iterations,
                "model trained successfully (iteration limit reached before convergence)"
            );
        }
    }
}
