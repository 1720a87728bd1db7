//! Feature vectors and the word + character feature extractor.
//!
//! A [`FeatureVector`] is sparse: comments are short and the combined
//! vocabulary holds up to 20,000 terms, so only non-zero entries are kept.
//!
//! The [`FeatureExtractor`] concatenates two independently L2-normalized
//! TF-IDF sub-vectors:
//!
//! ```text
//! [ word uni/bigrams (≤ 12,000) | char 3..5-grams (≤ 8,000) ]
//! ```
//!
//! Character spans give partial-match signal for short comments that share
//! no whole word with the training vocabulary.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MoodlensError, Result};
use crate::ml::tfidf::{TfIdfState, TfIdfVectorizer, VectorizerConfig};

/// Sparse numeric feature vector with a fixed dimensionality.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    dim: usize,
    /// Non-zero entries, sorted by index.
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// An all-zero vector of the given dimensionality.
    pub fn zeros(dim: usize) -> Self {
        FeatureVector {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build a vector from `(index, value)` pairs.
    ///
    /// Entries are sorted, zero values and out-of-range indices are dropped,
    /// and duplicate indices are summed.
    pub fn from_entries(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(index, value)| index < dim && value != 0.0);
        entries.sort_by_key(|&(index, _)| index);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            match merged.last_mut() {
                Some((last, total)) if *last == index => *total += value,
                _ => merged.push((index, value)),
            }
        }

        FeatureVector {
            dim,
            entries: merged,
        }
    }

    /// Dimensionality of the vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every component is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-zero entries in index order.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Value at `index` (zero when absent).
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, value)| value * value)
            .sum::<f64>()
            .sqrt()
    }

    /// Scale to unit Euclidean norm. Zero vectors are left unchanged.
    pub fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, value) in &mut self.entries {
                *value /= norm;
            }
        }
    }

    /// Dot product against a dense slice of length `dim`.
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(index, value)| value * dense[index])
            .sum()
    }

    /// Concatenate `other` after `self`.
    pub fn concat(mut self, other: &FeatureVector) -> FeatureVector {
        let offset = self.dim;
        self.entries.extend(
            other
                .entries
                .iter()
                .map(|&(index, value)| (index + offset, value)),
        );
        self.dim += other.dim;
        self
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(index, value) in &self.entries {
            dense[index] = value;
        }
        dense
    }
}

/// Serializable fitted state of the [`FeatureExtractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureExtractorState {
    /// Word n-gram vectorizer state.
    pub word: TfIdfState,
    /// Character n-gram vectorizer state.
    pub char: TfIdfState,
}

/// Joint word + character TF-IDF feature extractor.
#[derive(Debug)]
pub struct FeatureExtractor {
    word: TfIdfVectorizer,
    char: TfIdfVectorizer,
}

impl FeatureExtractor {
    /// Create an unfitted extractor.
    pub fn new(word: VectorizerConfig, char: VectorizerConfig) -> Result<Self> {
        Ok(FeatureExtractor {
            word: TfIdfVectorizer::new(word)?,
            char: TfIdfVectorizer::new(char)?,
        })
    }

    /// Rebuild a fitted extractor from stored state, without the corpus.
    pub fn from_state(state: FeatureExtractorState) -> Result<Self> {
        Ok(FeatureExtractor {
            word: TfIdfVectorizer::from_state(state.word)?,
            char: TfIdfVectorizer::from_state(state.char)?,
        })
    }

    /// Fit both vocabularies on the same normalized corpus.
    pub fn fit(&mut self, corpus: &[String]) -> Result<()> {
        self.word.fit(corpus)?;
        self.char.fit(corpus)?;
        debug!(
            word_terms = self.word.vocabulary_size(),
            char_terms = self.char.vocabulary_size(),
            "fitted feature vocabularies"
        );
        Ok(())
    }

    /// Transform normalized text into a feature vector.
    ///
    /// Never fails: a sub-extractor that cannot process the text contributes
    /// an all-zero block.
    pub fn transform(&self, text: &str) -> FeatureVector {
        let word = Self::transform_or_zero(&self.word, text);
        let char = Self::transform_or_zero(&self.char, text);
        word.concat(&char)
    }

    /// Fallible variant of [`transform`](Self::transform).
    pub fn try_transform(&self, text: &str) -> Result<FeatureVector> {
        let extract = |vectorizer: &TfIdfVectorizer| {
            vectorizer
                .transform(text)
                .map_err(|e| MoodlensError::feature_extraction(e.to_string()))
        };
        Ok(extract(&self.word)?.concat(&extract(&self.char)?))
    }

    fn transform_or_zero(vectorizer: &TfIdfVectorizer, text: &str) -> FeatureVector {
        vectorizer.transform(text).unwrap_or_else(|e| {
            debug!(analyzer = vectorizer.analyzer_name(), "feature extraction failed: {e}");
            FeatureVector::zeros(vectorizer.vocabulary_size())
        })
    }

    /// Total dimensionality (word + char).
    pub fn dim(&self) -> usize {
        self.word.vocabulary_size() + self.char.vocabulary_size()
    }

    /// Word vocabulary size.
    pub fn word_vocabulary_size(&self) -> usize {
        self.word.vocabulary_size()
    }

    /// Character vocabulary size.
    pub fn char_vocabulary_size(&self) -> usize {
        self.char.vocabulary_size()
    }

    /// Snapshot of the fitted state for serialization.
    pub fn state(&self) -> FeatureExtractorState {
        FeatureExtractorState {
            word: self.word.state().clone(),
            char: self.char.state().clone(),
        }
    }
}
