//! Character n-gram tokenizer implementation.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::{MoodlensError, Result};

/// A tokenizer that generates character n-grams.
///
/// Spaces are ordinary characters here, so `"a day"` yields spans such as
/// `"a d"` that straddle a word boundary. This gives short comments partial
/// overlap with the training vocabulary even when no whole word matches.
///
/// # Examples
///
/// ```
/// use moodlens::analysis::tokenizer::ngram::NgramTokenizer;
/// use moodlens::analysis::tokenizer::Tokenizer;
///
/// let tokenizer = NgramTokenizer::new(2, 3).unwrap();
/// let tokens: Vec<_> = tokenizer.tokenize("abc").unwrap()
///     .map(|t| t.text.to_string())
///     .collect();
/// assert_eq!(tokens, vec!["ab", "abc", "bc"]);
/// ```
#[derive(Clone, Debug)]
pub struct NgramTokenizer {
    /// Minimum n-gram size
    min_gram: usize,
    /// Maximum n-gram size
    max_gram: usize,
}

impl NgramTokenizer {
    /// Create a new n-gram tokenizer.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_gram` is 0 or `max_gram` is less than `min_gram`.
    pub fn new(min_gram: usize, max_gram: usize) -> Result<Self> {
        if min_gram == 0 {
            return Err(MoodlensError::analysis("min_gram must be at least 1"));
        }
        if max_gram < min_gram {
            return Err(MoodlensError::analysis(format!(
                "max_gram ({max_gram}) must be >= min_gram ({min_gram})"
            )));
        }
        Ok(Self { min_gram, max_gram })
    }

    /// Smallest span length emitted.
    pub fn min_gram(&self) -> usize {
        self.min_gram
    }

    /// Largest span length emitted.
    pub fn max_gram(&self) -> usize {
        self.max_gram
    }
}

impl Tokenizer for NgramTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        // Byte offset of every char boundary, including the end of the text.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = boundaries.len() - 1;

        let mut tokens = Vec::new();
        for start in 0..char_count {
            for gram_size in self.min_gram..=self.max_gram {
                let end = start + gram_size;
                if end > char_count {
                    break;
                }
                let (start_offset, end_offset) = (boundaries[start], boundaries[end]);
                tokens.push(Token::with_offsets(
                    &text[start_offset..end_offset],
                    tokens.len(),
                    start_offset,
                    end_offset,
                ));
            }
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "ngram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ngram_creation() {
        assert!(NgramTokenizer::new(3, 5).is_ok());
        assert!(NgramTokenizer::new(0, 2).is_err());
        assert!(NgramTokenizer::new(3, 2).is_err());
    }

    #[test]
    fn test_trigram() {
        let tokenizer = NgramTokenizer::new(3, 3).unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("hello").unwrap().collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "hel");
        assert_eq!(tokens[1].text, "ell");
        assert_eq!(tokens[2].text, "llo");
    }

    #[test]
    fn test_spans_cross_spaces() {
        let tokenizer = NgramTokenizer::new(3, 3).unwrap();
        let texts: Vec<String> = tokenizer
            .tokenize("a day")
            .unwrap()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["a d", " da", "day"]);
    }

    #[test]
    fn test_three_to_five_counts() {
        // For n chars, spans of length k number n - k + 1.
        let tokenizer = NgramTokenizer::new(3, 5).unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("abcdef").unwrap().collect();
        assert_eq!(tokens.len(), 4 + 3 + 2);
    }

    #[test]
    fn test_multibyte_offsets() {
        let tokenizer = NgramTokenizer::new(2, 2).unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("日本語").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "日本");
        assert_eq!(tokens[0].start_offset, 0);
        assert_eq!(tokens[0].end_offset, 6);
        assert_eq!(tokens[1].text, "本語");
        assert_eq!(tokens[1].start_offset, 3);
        assert_eq!(tokens[1].end_offset, 9);
    }

    #[test]
    fn test_short_text() {
        let tokenizer = NgramTokenizer::new(3, 5).unwrap();
        assert_eq!(tokenizer.tokenize("ab").unwrap().count(), 0);
        assert_eq!(tokenizer.tokenize("").unwrap().count(), 0);
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(NgramTokenizer::new(3, 5).unwrap().name(), "ngram");
    }
}
