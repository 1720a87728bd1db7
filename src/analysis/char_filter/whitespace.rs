//! Whitespace collapsing char filter.

use super::CharFilter;

/// Collapses every run of whitespace into a single ASCII space.
///
/// Leading and trailing whitespace is kept (as one space) so character
/// n-grams still see word boundaries at the edges of the text.
#[derive(Clone, Debug, Default)]
pub struct CollapseWhitespaceCharFilter;

impl CollapseWhitespaceCharFilter {
    /// Create a new whitespace collapsing filter.
    pub fn new() -> Self {
        CollapseWhitespaceCharFilter
    }
}

impl CharFilter for CollapseWhitespaceCharFilter {
    fn filter(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        let mut in_space = false;
        for c in input.chars() {
            if c.is_whitespace() {
                if !in_space {
                    output.push(' ');
                }
                in_space = true;
            } else {
                output.push(c);
                in_space = false;
            }
        }
        output
    }

    fn name(&self) -> &'static str {
        "collapse_whitespace"
    }
}
