//! Pluggable chunk-length measures.
//!
//! Chunk size and overlap budgets are expressed in whatever unit the
//! configured length function returns. Character count is the default;
//! a whitespace-token count is provided for callers that budget against
//! model token limits rather than raw text length.

use std::sync::Arc;

/// A pluggable length measure.
///
/// Must be monotonic non-decreasing under concatenation; the merge step sums
/// per-unit lengths, which is exact for additive measures like character or
/// token counts.
pub type LengthFn = Arc<dyn Fn(&str) -> usize + Send + Sync>;

/// Length in Unicode scalar values. The default measure.
#[must_use]
pub fn char_count() -> LengthFn {
    Arc::new(|s: &str| s.chars().count())
}

/// Length in whitespace-separated tokens, a rough proxy for model tokens.
#[must_use]
pub fn token_count() -> LengthFn {
    Arc::new(|s: &str| s.split_whitespace().count())
}
