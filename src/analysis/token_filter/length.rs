//! Minimum length filter.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Drops tokens with fewer than `min_chars` characters.
///
/// The word vectorizer uses this with `min_chars = 2` so single letters left
/// behind by normalization ("i", "s" from "it's") never become features.
#[derive(Clone, Debug)]
pub struct MinLengthFilter {
    min_chars: usize,
}

impl MinLengthFilter {
    /// Create a filter keeping tokens of at least `min_chars` characters.
    pub fn new(min_chars: usize) -> Self {
        MinLengthFilter { min_chars }
    }
}

impl Filter for MinLengthFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let min_chars = self.min_chars;
        Ok(Box::new(
            tokens.filter(move |token| token.text.chars().count() >= min_chars),
        ))
    }

    fn name(&self) -> &'static str {
        "min_length"
    }
}
