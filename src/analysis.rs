//! Text analysis module for moodlens.
//!
//! This module provides the text cleaning and tokenization that feed the
//! feature extractor: char filters, the shared [`normalizer::TextNormalizer`],
//! tokenizers, token filters and the analyzer pipeline that strings them
//! together.

pub mod analyzer;
pub mod char_filter;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
