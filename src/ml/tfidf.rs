//! TF-IDF vectorizer for text feature extraction.
//!
//! Weighting: raw term count × smoothed inverse document frequency,
//! `idf = ln((N + 1) / (df + 1)) + 1`, followed by L2 normalization of the
//! resulting vector.
//!
//! When `max_features` is set, the vocabulary keeps the terms with the
//! highest total corpus frequency (ties broken by term order). Feature
//! indices are then assigned in lexicographic term order, so fitting is a
//! pure function of the corpus and configuration.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::char_filter::whitespace::CollapseWhitespaceCharFilter;
use crate::analysis::token_filter::length::MinLengthFilter;
use crate::analysis::token_filter::shingle::ShingleFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::ngram::NgramTokenizer;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::{MoodlensError, Result};
use crate::ml::features::FeatureVector;

/// Default word vocabulary cap.
pub const DEFAULT_WORD_MAX_FEATURES: usize = 12_000;

/// Default character vocabulary cap.
pub const DEFAULT_CHAR_MAX_FEATURES: usize = 8_000;

/// Which unit the vectorizer counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    /// Whitespace-separated words, joined into n-gram shingles.
    Word,
    /// Contiguous character spans.
    Char,
}

/// Configuration for one TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Counting unit.
    pub analyzer: AnalyzerKind,
    /// Inclusive n-gram size range.
    pub ngram_range: (usize, usize),
    /// Vocabulary cap; `None` keeps every term.
    pub max_features: Option<usize>,
    /// Remove English stop words before building n-grams (word analyzer only).
    pub remove_stop_words: bool,
    /// Drop words shorter than this many characters (word analyzer only).
    pub min_token_chars: usize,
}

impl VectorizerConfig {
    /// Word unigrams and bigrams, English stop words removed, 12,000 terms.
    pub fn word() -> Self {
        VectorizerConfig {
            analyzer: AnalyzerKind::Word,
            ngram_range: (1, 2),
            max_features: Some(DEFAULT_WORD_MAX_FEATURES),
            remove_stop_words: true,
            min_token_chars: 2,
        }
    }

    /// Character spans of 3 to 5, 8,000 terms.
    pub fn char() -> Self {
        VectorizerConfig {
            analyzer: AnalyzerKind::Char,
            ngram_range: (3, 5),
            max_features: Some(DEFAULT_CHAR_MAX_FEATURES),
            remove_stop_words: false,
            min_token_chars: 0,
        }
    }

    /// Check the configuration for inconsistent values.
    pub fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || max_n < min_n {
            return Err(MoodlensError::invalid_config(format!(
                "ngram_range ({min_n}, {max_n}) must satisfy 1 <= min <= max"
            )));
        }
        if self.max_features == Some(0) {
            return Err(MoodlensError::invalid_config(
                "max_features must be positive when set",
            ));
        }
        Ok(())
    }

    /// Build the analyzer described by this configuration.
    pub fn build_analyzer(&self) -> Result<PipelineAnalyzer> {
        self.validate()?;
        let (min_n, max_n) = self.ngram_range;

        let analyzer = match self.analyzer {
            AnalyzerKind::Word => {
                let mut analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()));
                if self.min_token_chars > 1 {
                    analyzer =
                        analyzer.add_filter(Arc::new(MinLengthFilter::new(self.min_token_chars)));
                }
                if self.remove_stop_words {
                    analyzer = analyzer.add_filter(Arc::new(StopFilter::english()));
                }
                analyzer
                    .add_filter(Arc::new(ShingleFilter::new(min_n, max_n)?))
                    .with_name(format!("word_{min_n}_{max_n}"))
            }
            AnalyzerKind::Char => {
                PipelineAnalyzer::new(Arc::new(NgramTokenizer::new(min_n, max_n)?))
                    .add_char_filter(Arc::new(CollapseWhitespaceCharFilter::new()))
                    .with_name(format!("char_{min_n}_{max_n}"))
            }
        };

        Ok(analyzer)
    }
}

/// Serializable fitted state of a [`TfIdfVectorizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfState {
    /// Configuration used to fit.
    pub config: VectorizerConfig,
    /// Vocabulary: term -> index mapping.
    pub vocabulary: BTreeMap<String, usize>,
    /// Inverse document frequency for each index.
    pub idf: Vec<f64>,
    /// Number of documents seen during fitting.
    pub n_documents: usize,
}

/// TF-IDF vectorizer for text feature extraction.
pub struct TfIdfVectorizer {
    state: TfIdfState,
    /// Analyzer for tokenization, rebuilt from `state.config`.
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.state.vocabulary.len())
            .field("n_documents", &self.state.n_documents)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a new, unfitted vectorizer.
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        let analyzer = Arc::new(config.build_analyzer()?);
        Ok(Self {
            state: TfIdfState {
                config,
                vocabulary: BTreeMap::new(),
                idf: Vec::new(),
                n_documents: 0,
            },
            analyzer,
        })
    }

    /// Rebuild a fitted vectorizer from stored state.
    pub fn from_state(state: TfIdfState) -> Result<Self> {
        if state.idf.len() != state.vocabulary.len() {
            return Err(MoodlensError::artifact_corrupt(format!(
                "idf length {} does not match vocabulary size {}",
                state.idf.len(),
                state.vocabulary.len()
            )));
        }
        if state.vocabulary.values().any(|&index| index >= state.idf.len()) {
            return Err(MoodlensError::artifact_corrupt(
                "vocabulary index out of range",
            ));
        }
        let analyzer = Arc::new(state.config.build_analyzer()?);
        Ok(Self { state, analyzer })
    }

    /// Fit the vectorizer on training documents.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        let per_document: Vec<HashMap<String, usize>> = documents
            .par_iter()
            .map(|doc| self.term_counts(doc))
            .collect::<Result<_>>()?;

        // Totals are accumulated sequentially in corpus order.
        let mut term_frequency: HashMap<&str, usize> = HashMap::new();
        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for counts in &per_document {
            for (term, count) in counts {
                *term_frequency.entry(term.as_str()).or_insert(0) += count;
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if term_frequency.is_empty() {
            return Err(MoodlensError::training(format!(
                "empty vocabulary for analyzer {}; the corpus has no usable terms",
                self.analyzer.name()
            )));
        }

        let mut ranked: Vec<(&str, usize)> = term_frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if let Some(max_features) = self.state.config.max_features {
            ranked.truncate(max_features);
        }

        let mut selected: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        selected.sort_unstable();

        let n_documents = documents.len();
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(selected.len());
        for (index, term) in selected.into_iter().enumerate() {
            let df = document_frequency.get(term).copied().unwrap_or(0);
            // IDF = ln((N + 1) / (df + 1)) + 1
            idf.push(((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0);
            vocabulary.insert(term.to_string(), index);
        }

        self.state.vocabulary = vocabulary;
        self.state.idf = idf;
        self.state.n_documents = n_documents;

        Ok(())
    }

    /// Transform a document into an L2-normalized TF-IDF feature vector.
    pub fn transform(&self, document: &str) -> Result<FeatureVector> {
        let counts = self.term_counts(document)?;
        let entries = counts
            .into_iter()
            .filter_map(|(term, count)| {
                self.state
                    .vocabulary
                    .get(&term)
                    .map(|&index| (index, count as f64 * self.state.idf[index]))
            })
            .collect();

        let mut vector = FeatureVector::from_entries(self.vocabulary_size(), entries);
        vector.l2_normalize();
        Ok(vector)
    }

    /// Count analyzed terms in a document.
    fn term_counts(&self, document: &str) -> Result<HashMap<String, usize>> {
        let mut counts = HashMap::new();
        for token in self.analyzer.analyze(document)? {
            *counts.entry(token.text).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.state.vocabulary.len()
    }

    /// Index of a term, if it is in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.state.vocabulary.get(term).copied()
    }

    /// Name of the underlying analyzer.
    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    /// Fitted state.
    pub fn state(&self) -> &TfIdfState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tfidf_vectorizer() {
        let documents = docs(&["great staff", "slow staff", "great view"]);

        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::word()).unwrap();
        vectorizer.fit(&documents).unwrap();
        // great, slow, staff, view + three bigrams
        assert_eq!(vectorizer.vocabulary_size(), 7);

        let features = vectorizer.transform("great staff").unwrap();
        assert_eq!(features.dim(), vectorizer.vocabulary_size());
        assert!((features.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_indices_are_lexicographic() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::word()).unwrap();
        vectorizer.fit(&docs(&["zebra apple", "mango"])).unwrap();

        assert_eq!(vectorizer.term_index("apple"), Some(0));
        assert_eq!(vectorizer.term_index("mango"), Some(1));
        assert_eq!(vectorizer.term_index("zebra"), Some(2));
        assert_eq!(vectorizer.term_index("zebra apple"), Some(3));
    }

    #[test]
    fn test_idf_values() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::word()).unwrap();
        vectorizer.fit(&docs(&["happy", "happy sad"])).unwrap();

        let state = vectorizer.state();
        let happy = state.vocabulary["happy"];
        let sad = state.vocabulary["sad"];
        // happy appears in both documents, sad in one.
        assert!((state.idf[happy] - 1.0).abs() < 1e-12);
        assert!((state.idf[sad] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let config = VectorizerConfig {
            max_features: Some(2),
            ngram_range: (1, 1),
            ..VectorizerConfig::word()
        };
        let mut vectorizer = TfIdfVectorizer::new(config).unwrap();
        vectorizer
            .fit(&docs(&["good good good", "bad bad", "meh", "good bad"]))
            .unwrap();

        assert_eq!(vectorizer.vocabulary_size(), 2);
        assert!(vectorizer.term_index("good").is_some());
        assert!(vectorizer.term_index("bad").is_some());
        assert!(vectorizer.term_index("meh").is_none());
    }

    #[test]
    fn test_max_features_tie_break_is_lexicographic() {
        let config = VectorizerConfig {
            max_features: Some(1),
            ngram_range: (1, 1),
            ..VectorizerConfig::word()
        };
        let mut vectorizer = TfIdfVectorizer::new(config).unwrap();
        vectorizer.fit(&docs(&["beta", "alpha"])).unwrap();
        assert_eq!(vectorizer.term_index("alpha"), Some(0));
        assert!(vectorizer.term_index("beta").is_none());
    }

    #[test]
    fn test_stop_words_and_short_tokens_removed() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::word()).unwrap();
        vectorizer.fit(&docs(&["i am the best"])).unwrap();
        assert_eq!(vectorizer.vocabulary_size(), 1);
        assert!(vectorizer.term_index("best").is_some());
    }

    #[test]
    fn test_empty_vocabulary_is_error() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::word()).unwrap();
        assert!(vectorizer.fit(&docs(&["the and of", ""])).is_err());
    }

    #[test]
    fn test_char_vectorizer() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::char()).unwrap();
        vectorizer.fit(&docs(&["happy"])).unwrap();
        // hap app ppy happ appy happy
        assert_eq!(vectorizer.vocabulary_size(), 6);

        let unseen = vectorizer.transform("xyz").unwrap();
        assert!(unseen.is_zero());
    }

    #[test]
    fn test_from_state_rejects_inconsistent_state() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::word()).unwrap();
        vectorizer.fit(&docs(&["good day"])).unwrap();

        let mut state = vectorizer.state().clone();
        state.idf.pop();
        assert!(TfIdfVectorizer::from_state(state).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let config = VectorizerConfig {
            ngram_range: (0, 2),
            ..VectorizerConfig::word()
        };
        assert!(config.validate().is_err());
        assert!(TfIdfVectorizer::new(config).is_err());
    }
}
