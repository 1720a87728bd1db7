//! Multinomial logistic regression over sparse feature vectors.
//!
//! The model minimizes the class-weighted softmax cross-entropy plus an L2
//! penalty on the coefficients:
//!
//! ```text
//! J(W, b) = (1 / S) Σ s_i · CE(softmax(W x_i + b), y_i) + (1 / (2 C S)) ‖W‖²
//! ```
//!
//! where `s_i` is the sample weight (balanced: `n / (k · count(y_i))`) and
//! `S = Σ s_i`. Optimization is full-batch gradient descent with a bounded
//! iteration count; reaching the cap is reported, never an error.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MoodlensError, Result};
use crate::ml::features::FeatureVector;

/// Samples per gradient work unit. Fixed so the reduction order does not
/// depend on the number of worker threads.
const GRADIENT_CHUNK: usize = 256;

/// Sample weighting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// Every sample counts once.
    Uniform,
    /// Weight inversely proportional to class frequency.
    Balanced,
}

/// Classifier hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Inverse regularization strength.
    pub c: f64,
    /// Maximum number of gradient steps.
    pub max_iter: usize,
    /// Stop once the loss improves by less than this.
    pub tolerance: f64,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Sample weighting.
    pub class_weight: ClassWeight,
    /// Learn a per-class intercept.
    pub fit_intercept: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 2500,
            tolerance: 1e-6,
            learning_rate: 1.0,
            class_weight: ClassWeight::Balanced,
            fit_intercept: true,
        }
    }
}

impl ClassifierConfig {
    /// Check the hyperparameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(MoodlensError::invalid_config("c must be positive and finite"));
        }
        if self.max_iter == 0 {
            return Err(MoodlensError::invalid_config("max_iter must be at least 1"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(MoodlensError::invalid_config(
                "learning_rate must be positive and finite",
            ));
        }
        if self.tolerance < 0.0 {
            return Err(MoodlensError::invalid_config("tolerance must be >= 0"));
        }
        Ok(())
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Number of gradient steps taken.
    pub iterations: usize,
    /// Whether the tolerance was reached before `max_iter`.
    pub converged: bool,
    /// Objective value at the returned parameters.
    pub final_loss: f64,
    /// Wall-clock fitting time.
    pub training_time_ms: u64,
}

/// A single prediction with its softmax probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Winning label.
    pub label: String,
    /// Softmax probability of the winning label.
    pub confidence: f64,
}

/// Fitted multinomial logistic regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Class labels, sorted.
    classes: Vec<String>,
    /// Input dimensionality.
    n_features: usize,
    /// Row-major `classes.len() × n_features` coefficient matrix.
    coefficients: Vec<f64>,
    /// One intercept per class.
    intercepts: Vec<f64>,
}

/// Per-chunk gradient accumulator.
struct GradientChunk {
    coefficients: Vec<f64>,
    intercepts: Vec<f64>,
    loss: f64,
}

impl LogisticRegression {
    /// Fit a model on feature vectors and their labels.
    pub fn fit(
        x: &[FeatureVector],
        y: &[String],
        config: &ClassifierConfig,
    ) -> Result<(Self, TrainingStats)> {
        config.validate()?;
        if x.len() != y.len() {
            return Err(MoodlensError::training(format!(
                "{} feature vectors but {} labels",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(MoodlensError::training("no training samples"));
        }
        let n_features = x[0].dim();
        if x.iter().any(|v| v.dim() != n_features) {
            return Err(MoodlensError::training("feature vectors differ in dimensionality"));
        }

        let mut class_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for label in y {
            *class_counts.entry(label.as_str()).or_insert(0) += 1;
        }
        if class_counts.len() < 2 {
            return Err(MoodlensError::training(format!(
                "need at least two distinct labels, found {}",
                class_counts.len()
            )));
        }

        let classes: Vec<String> = class_counts.keys().map(|c| c.to_string()).collect();
        let n_classes = classes.len();
        let targets: Vec<usize> = y
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect();
        let weights = Self::sample_weights(&targets, &class_counts, n_classes, config.class_weight);
        let weight_sum: f64 = weights.iter().sum();
        let l2 = 1.0 / (config.c * weight_sum);

        let mut model = LogisticRegression {
            classes,
            n_features,
            coefficients: vec![0.0; n_classes * n_features],
            intercepts: vec![0.0; n_classes],
        };

        let start = Instant::now();
        let mut previous_loss = f64::INFINITY;
        let mut final_loss = f64::INFINITY;
        let mut iterations = 0;
        let mut converged = false;

        for iteration in 0..config.max_iter {
            let gradient = model.gradient(x, &targets, &weights);
            let penalty: f64 = model.coefficients.iter().map(|w| w * w).sum::<f64>() * l2 / 2.0;
            let loss = gradient.loss / weight_sum + penalty;
            final_loss = loss;
            iterations = iteration + 1;

            if (previous_loss - loss).abs() < config.tolerance {
                converged = true;
                break;
            }
            previous_loss = loss;

            let step = config.learning_rate;
            for (w, g) in model.coefficients.iter_mut().zip(&gradient.coefficients) {
                *w -= step * (g / weight_sum + l2 * *w);
            }
            if config.fit_intercept {
                for (b, g) in model.intercepts.iter_mut().zip(&gradient.intercepts) {
                    *b -= step * g / weight_sum;
                }
            }

            if iteration % 250 == 0 {
                debug!(iteration, loss, "gradient descent progress");
            }
        }

        let stats = TrainingStats {
            iterations,
            converged,
            final_loss,
            training_time_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            iterations = stats.iterations,
            converged = stats.converged,
            final_loss = stats.final_loss,
            "classifier fitted"
        );

        Ok((model, stats))
    }

    fn sample_weights(
        targets: &[usize],
        class_counts: &BTreeMap<&str, usize>,
        n_classes: usize,
        class_weight: ClassWeight,
    ) -> Vec<f64> {
        match class_weight {
            ClassWeight::Uniform => vec![1.0; targets.len()],
            ClassWeight::Balanced => {
                let n_samples = targets.len() as f64;
                let per_class: Vec<f64> = class_counts
                    .values()
                    .map(|&count| n_samples / (n_classes as f64 * count as f64))
                    .collect();
                targets.iter().map(|&t| per_class[t]).collect()
            }
        }
    }

    /// Unnormalized weighted gradient and loss at the current parameters.
    fn gradient(&self, x: &[FeatureVector], targets: &[usize], weights: &[f64]) -> GradientChunk {
        let n_classes = self.classes.len();
        let chunks: Vec<GradientChunk> = x
            .par_chunks(GRADIENT_CHUNK)
            .zip(targets.par_chunks(GRADIENT_CHUNK))
            .zip(weights.par_chunks(GRADIENT_CHUNK))
            .map(|((xs, ts), ws)| {
                let mut chunk = GradientChunk {
                    coefficients: vec![0.0; n_classes * self.n_features],
                    intercepts: vec![0.0; n_classes],
                    loss: 0.0,
                };
                for ((v, &target), &weight) in xs.iter().zip(ts).zip(ws) {
                    let probabilities = softmax(&self.decision_function(v));
                    chunk.loss -= weight * probabilities[target].max(f64::MIN_POSITIVE).ln();
                    for (class, &p) in probabilities.iter().enumerate() {
                        let error = weight * (p - if class == target { 1.0 } else { 0.0 });
                        chunk.intercepts[class] += error;
                        let row = class * self.n_features;
                        for &(index, value) in v.entries() {
                            chunk.coefficients[row + index] += error * value;
                        }
                    }
                }
                chunk
            })
            .collect();

        // Reduce in chunk order so the sum is the same on every run.
        let mut total = GradientChunk {
            coefficients: vec![0.0; n_classes * self.n_features],
            intercepts: vec![0.0; n_classes],
            loss: 0.0,
        };
        for chunk in chunks {
            for (t, c) in total.coefficients.iter_mut().zip(&chunk.coefficients) {
                *t += c;
            }
            for (t, c) in total.intercepts.iter_mut().zip(&chunk.intercepts) {
                *t += c;
            }
            total.loss += chunk.loss;
        }
        total
    }

    /// Raw per-class scores `W x + b`.
    ///
    /// Entries beyond the model's dimensionality are ignored.
    pub fn decision_function(&self, v: &FeatureVector) -> Vec<f64> {
        (0..self.classes.len())
            .map(|class| {
                let start = class * self.n_features;
                let row = &self.coefficients[start..start + self.n_features];
                let dot: f64 = v
                    .entries()
                    .iter()
                    .filter(|(index, _)| *index < self.n_features)
                    .map(|&(index, value)| value * row[index])
                    .sum();
                dot + self.intercepts[class]
            })
            .collect()
    }

    /// Softmax class probabilities, aligned with [`classes`](Self::classes).
    pub fn predict_proba(&self, v: &FeatureVector) -> Vec<f64> {
        softmax(&self.decision_function(v))
    }

    /// The highest-scoring label. Ties go to the first class in sorted order.
    pub fn predict(&self, v: &FeatureVector) -> &str {
        let scores = self.decision_function(v);
        &self.classes[argmax(&scores)]
    }

    /// The highest-scoring label with its probability.
    pub fn predict_with_confidence(&self, v: &FeatureVector) -> Prediction {
        let probabilities = self.predict_proba(v);
        let best = argmax(&probabilities);
        Prediction {
            label: self.classes[best].clone(),
            confidence: probabilities[best],
        }
    }

    /// Known class labels, sorted.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Input dimensionality.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Check internal shape consistency (used after deserialization).
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(MoodlensError::artifact_corrupt("classifier has no classes"));
        }
        if self.coefficients.len() != self.classes.len() * self.n_features
            || self.intercepts.len() != self.classes.len()
        {
            return Err(MoodlensError::artifact_corrupt(
                "classifier parameter shapes do not match class count",
            ));
        }
        Ok(())
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = index;
        }
    }
    best
}
