//! Parse context configuration

use serde::{Deserialize, Serialize};

use crate::literal::NumericFallback;

/// Configuration for an [`ExpressionParser`](crate::ExpressionParser).
///
/// Deserializable so hosts can keep it next to their own settings; missing
/// fields take their defaults.
///
/// ```
/// use quickbeam::{NumericFallback, ParseContext};
///
/// let ctx: ParseContext = serde_json::from_str(r#"{"numeric_fallback": "zero"}"#).unwrap();
/// assert_eq!(ctx.numeric_fallback, NumericFallback::Zero);
/// assert!(ctx.cache_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseContext {
    /// Policy for numeric atoms that fit no numeric type
    pub numeric_fallback: NumericFallback,

    /// Whether parse results are cached by input text
    pub cache_enabled: bool,

    /// Most cached parse results kept at once
    pub cache_capacity: usize,

    /// Maximum nesting depth (stack overflow protection)
    pub max_depth: usize,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self {
            numeric_fallback: NumericFallback::Reject,
            cache_enabled: true,
            cache_capacity: 1024,
            max_depth: 256,
        }
    }
}

impl ParseContext {
    /// Create a context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different numeric fallback policy.
    pub fn with_numeric_fallback(mut self, fallback: NumericFallback) -> Self {
        self.numeric_fallback = fallback;
        self
    }

    /// Turn the parse cache on or off.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Bound the parse cache to `capacity` entries.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Use a custom nesting depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
