//! Text normalization shared by training and inference.
//!
//! The [`TextNormalizer`] is a fixed char-filter chain: lower-case, then drop
//! every character outside the configured keep-set. Its configuration is
//! stored inside the model artifact so both sides of the model run exactly
//! the same cleaning.
//!
//! # Examples
//!
//! ```
//! use moodlens::analysis::normalizer::TextNormalizer;
//!
//! let normalizer = TextNormalizer::new();
//! assert_eq!(normalizer.normalize("I'm SO happy :)"), "im so happy ");
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::char_filter::CharFilter;
use crate::analysis::char_filter::lowercase::LowercaseCharFilter;
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::error::Result;

/// Characters removed after lower-casing: anything but `a-z` and space.
pub const DEFAULT_STRIP_PATTERN: &str = "[^a-z ]";

/// Serializable normalizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Lower-case the input before stripping.
    pub lowercase: bool,
    /// Regex of characters to delete.
    pub strip_pattern: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_pattern: DEFAULT_STRIP_PATTERN.to_string(),
        }
    }
}

/// Deterministic text cleaner.
///
/// `normalize` is total: it never fails, and with the default configuration
/// it is idempotent (`normalize(normalize(x)) == normalize(x)`).
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    config: NormalizerConfig,
    lowercase: Option<LowercaseCharFilter>,
    strip: PatternReplaceCharFilter,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a normalizer with the default configuration.
    pub fn new() -> Self {
        TextNormalizer {
            config: NormalizerConfig::default(),
            lowercase: Some(LowercaseCharFilter::new()),
            strip: PatternReplaceCharFilter::new(DEFAULT_STRIP_PATTERN, "")
                .expect("default strip pattern is a valid regex"),
        }
    }

    /// Build a normalizer from a stored configuration.
    pub fn from_config(config: NormalizerConfig) -> Result<Self> {
        let strip = PatternReplaceCharFilter::new(&config.strip_pattern, "")?;
        let lowercase = config.lowercase.then(LowercaseCharFilter::new);
        Ok(TextNormalizer {
            config,
            lowercase,
            strip,
        })
    }

    /// The configuration this normalizer was built from.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a piece of raw text.
    pub fn normalize(&self, text: &str) -> String {
        match &self.lowercase {
            Some(lowercase) => self.strip.filter(&lowercase.filter(text)),
            None => self.strip.filter(text),
        }
    }
}
