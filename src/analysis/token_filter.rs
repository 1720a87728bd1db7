//! Token filter implementations for token transformation.
//!
//! Filters receive the stream produced by a tokenizer and return a new one.
//!
//! # Available Filters
//!
//! - [`stop::StopFilter`] - Removes stop words
//! - [`length::MinLengthFilter`] - Drops tokens shorter than a character count
//! - [`shingle::ShingleFilter`] - Emits word n-grams ("shingles")
//!
//! # Filter Chaining
//!
//! ```text
//! Tokenizer → MinLength → Stop Words → Shingles → Vectorizer
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod length;
pub mod shingle;
pub mod stop;
