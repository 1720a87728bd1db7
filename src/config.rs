//! Training configuration.
//!
//! Every knob of the training pipeline lives in [`TrainingConfig`]. The
//! defaults reproduce the production model; a JSON file may override any
//! subset of fields:
//!
//! ```json
//! {
//!   "word": { "analyzer": "word", "ngram_range": [1, 2], "max_features": 5000,
//!             "remove_stop_words": true, "min_token_chars": 2 },
//!   "classifier": { "c": 0.5, "max_iter": 1000, "tolerance": 1e-6,
//!                   "learning_rate": 1.0, "class_weight": "balanced",
//!                   "fit_intercept": true }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::NormalizerConfig;
use crate::error::{MoodlensError, Result};
use crate::ml::classifier::ClassifierConfig;
use crate::ml::tfidf::{AnalyzerKind, VectorizerConfig};

/// Where the trained model is written and read by default.
pub const DEFAULT_ARTIFACT_PATH: &str = "emotion_model.bin";

/// Full training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Text cleaning applied to training and inference input alike.
    pub normalizer: NormalizerConfig,
    /// Word n-gram vectorizer.
    pub word: VectorizerConfig,
    /// Character n-gram vectorizer.
    pub char: VectorizerConfig,
    /// Classifier hyperparameters.
    pub classifier: ClassifierConfig,
    /// Output location of the model artifact.
    pub artifact_path: PathBuf,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            word: VectorizerConfig::word(),
            char: VectorizerConfig::char(),
            classifier: ClassifierConfig::default(),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
        }
    }
}

impl TrainingConfig {
    /// Read a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MoodlensError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: TrainingConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        if self.word.analyzer != AnalyzerKind::Word {
            return Err(MoodlensError::invalid_config(
                "word vectorizer must use the word analyzer",
            ));
        }
        if self.char.analyzer != AnalyzerKind::Char {
            return Err(MoodlensError::invalid_config(
                "char vectorizer must use the char analyzer",
            ));
        }
        self.word.validate()?;
        self.char.validate()?;
        self.classifier.validate()?;
        if self.artifact_path.as_os_str().is_empty() {
            return Err(MoodlensError::invalid_config("artifact_path is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.word.max_features, Some(12_000));
        assert_eq!(config.char.max_features, Some(8_000));
        assert_eq!(config.char.ngram_range, (3, 5));
        assert_eq!(config.classifier.c, 1.0);
        assert_eq!(config.artifact_path, PathBuf::from("emotion_model.bin"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_override() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "artifact_path": "custom.bin" }}"#).unwrap();

        let config = TrainingConfig::from_file(file.path()).unwrap();
        assert_eq!(config.artifact_path, PathBuf::from("custom.bin"));
        assert_eq!(config.word, VectorizerConfig::word());
    }

    #[test]
    fn test_swapped_analyzers_rejected() {
        let config = TrainingConfig {
            word: VectorizerConfig::char(),
            ..TrainingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MoodlensError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = TrainingConfig::from_file("/nonexistent/moodlens.json");
        assert!(matches!(result, Err(MoodlensError::InvalidConfig(_))));
    }
}
