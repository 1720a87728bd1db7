//! Analyzers combine char filters, a tokenizer and token filters.
//!
//! ```text
//! Normalized Text → Char Filters → Tokenizer → Filter 1 → ... → Filter N → Terms
//! ```
//!
//! The feature extractor owns two analyzers: a word analyzer (whitespace
//! tokens, stop words removed, unigram and bigram shingles) and a character
//! analyzer (3 to 5 character spans).

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so analyzers can be shared across
/// concurrent inference calls.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and logging).
    fn name(&self) -> &str;
}

mod pipeline;

pub use pipeline::PipelineAnalyzer;
