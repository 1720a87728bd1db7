//! Shingle (word n-gram) filter.
//!
//! # Examples
//!
//! ```
//! use moodlens::analysis::token_filter::Filter;
//! use moodlens::analysis::token_filter::shingle::ShingleFilter;
//! use moodlens::analysis::token::Token;
//!
//! let filter = ShingleFilter::new(1, 2).unwrap();
//! let tokens = vec![Token::new("really", 0), Token::new("great", 1)];
//! let texts: Vec<String> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//!
//! assert_eq!(texts, vec!["really", "really great", "great"]);
//! ```

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{MoodlensError, Result};

/// Separator placed between words of a shingle.
pub const SHINGLE_SEPARATOR: &str = " ";

/// Emits every run of `min_size..=max_size` consecutive tokens as one token.
///
/// Shingles are built over the stream as it arrives, so when a stop filter
/// runs first, a bigram can join two words that had a stop word between them.
#[derive(Clone, Debug)]
pub struct ShingleFilter {
    min_size: usize,
    max_size: usize,
}

impl ShingleFilter {
    /// Create a shingle filter.
    pub fn new(min_size: usize, max_size: usize) -> Result<Self> {
        if min_size == 0 {
            return Err(MoodlensError::analysis("min_size must be at least 1"));
        }
        if max_size < min_size {
            return Err(MoodlensError::analysis(format!(
                "max_size ({max_size}) must be >= min_size ({min_size})"
            )));
        }
        Ok(ShingleFilter { min_size, max_size })
    }
}

impl Filter for ShingleFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let words: Vec<Token> = tokens.collect();
        let mut shingles = Vec::new();

        for start in 0..words.len() {
            for size in self.min_size..=self.max_size {
                let end = start + size;
                if end > words.len() {
                    break;
                }
                let window = &words[start..end];
                let text = window
                    .iter()
                    .map(|token| token.text.as_str())
                    .collect::<Vec<_>>()
                    .join(SHINGLE_SEPARATOR);
                shingles.push(
                    Token::with_offsets(
                        text,
                        shingles.len(),
                        window[0].start_offset,
                        window[size - 1].end_offset,
                    )
                    .with_position_length(size),
                );
            }
        }

        Ok(Box::new(shingles.into_iter()))
    }

    fn name(&self) -> &'static str {
        "shingle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(filter: &ShingleFilter, words: &[&str]) -> Vec<String> {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();
        filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_unigrams_and_bigrams() {
        let filter = ShingleFilter::new(1, 2).unwrap();
        assert_eq!(
            texts(&filter, &["food", "cold", "late"]),
            vec!["food", "food cold", "cold", "cold late", "late"]
        );
    }

    #[test]
    fn test_bigrams_only() {
        let filter = ShingleFilter::new(2, 2).unwrap();
        assert_eq!(texts(&filter, &["ab", "cd", "ef"]), vec!["ab cd", "cd ef"]);
        assert!(texts(&filter, &["alone"]).is_empty());
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(ShingleFilter::new(0, 2).is_err());
        assert!(ShingleFilter::new(3, 2).is_err());
    }
}
