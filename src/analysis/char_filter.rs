//! Char filter implementations for text normalization.
//!
//! Char filters pre-process the raw string before it reaches a tokenizer.
//! They are the building blocks of [`TextNormalizer`](crate::analysis::normalizer::TextNormalizer).
//!
//! # Available Filters
//!
//! - [`lowercase::LowercaseCharFilter`] - Unicode-aware lower-casing
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement
//! - [`whitespace::CollapseWhitespaceCharFilter`] - Collapses whitespace runs
//!
//! # Examples
//!
//! ```
//! use moodlens::analysis::char_filter::CharFilter;
//! use moodlens::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
//!
//! let filter = PatternReplaceCharFilter::new(r"[^a-z ]", "").unwrap();
//! assert_eq!(filter.filter("so happy!!"), "so happy");
//! ```

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod pattern_replace;
pub mod whitespace;
