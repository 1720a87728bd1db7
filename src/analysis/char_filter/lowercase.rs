//! Lowercase char filter.

use super::CharFilter;

/// A char filter that lower-cases the whole input.
///
/// Uses Unicode lower-casing, so `"ÉTÉ"` becomes `"été"`. Characters that
/// expand on lower-casing (such as `'İ'`) expand here too.
#[derive(Clone, Debug, Default)]
pub struct LowercaseCharFilter;

impl LowercaseCharFilter {
    /// Create a new lowercase char filter.
    pub fn new() -> Self {
        LowercaseCharFilter
    }
}

impl CharFilter for LowercaseCharFilter {
    fn filter(&self, input: &str) -> String {
        if input.is_ascii() {
            input.to_ascii_lowercase()
        } else {
            input.to_lowercase()
        }
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
