//! Parser facade: text to syntax tree to expression tree

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::Result;
use crate::grammar::{nesting_depth, parse_syntax, with_stack_for};
use crate::transform::ExpressionTransformer;
use crate::{EvaluatorRegistry, Expression, ParseContext};

/// A cached parse result and the registry generation it was built against.
#[derive(Debug, Clone)]
struct CacheEntry {
    generation: u64,
    expression: Expression,
}

/// Parses expression text into evaluator-bound [`Expression`] trees.
///
/// # Example
///
/// ```
/// use quickbeam::{ExpressionParser, Scope, Value};
///
/// let parser = ExpressionParser::default();
/// let expr = parser.parse("-a + 1").unwrap();
///
/// let mut scope = Scope::new();
/// scope.define("a", Value::I32(4));
/// assert_eq!(expr.evaluate(&scope).unwrap(), Value::I32(-3));
/// ```
#[derive(Debug)]
pub struct ExpressionParser {
    registry: Arc<EvaluatorRegistry>,
    context: ParseContext,
    cache: DashMap<String, CacheEntry>,
}

impl Default for ExpressionParser {
    fn default() -> Self {
        Self::new(Arc::new(EvaluatorRegistry::new()))
    }
}

impl ExpressionParser {
    /// Create a parser over `registry` with default settings.
    pub fn new(registry: Arc<EvaluatorRegistry>) -> Self {
        Self::with_context(registry, ParseContext::default())
    }

    /// Create a parser over `registry` with custom settings.
    pub fn with_context(registry: Arc<EvaluatorRegistry>, context: ParseContext) -> Self {
        Self {
            registry,
            context,
            cache: DashMap::new(),
        }
    }

    /// The registry names are resolved against.
    pub fn registry(&self) -> &Arc<EvaluatorRegistry> {
        &self.registry
    }

    /// The parser's settings.
    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    /// Parse `text` into an expression tree.
    ///
    /// Empty text yields the empty-string constant.
    ///
    /// Source positions recorded by the grammar are released before this
    /// returns, which invalidates any other `proc_macro2` span created on the
    /// calling thread.
    ///
    /// # Errors
    ///
    /// Any grammar failure, unknown name, invalid literal, unsupported
    /// construct, arity mismatch or nesting past the depth limit fails the
    /// whole parse.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse(&self, text: &str) -> Result<Expression> {
        if text.is_empty() {
            return Ok(Expression::constant(""));
        }

        let generation = self.registry.generation();
        if self.context.cache_enabled {
            if let Some(entry) = self.cache.get(text) {
                if entry.generation == generation {
                    debug!("parse cache hit");
                    return Ok(entry.expression.clone());
                }
            }
        }

        let depth = nesting_depth(text, self.context.max_depth)?;
        let result = with_stack_for(depth, || {
            let root = parse_syntax(text)?;
            ExpressionTransformer::new(&self.registry, &self.context).transform(&root)
        });
        // Errors hold copied locations; no span outlives the closure.
        proc_macro2::extra::invalidate_current_thread_spans();
        let expression = result?;

        if self.context.cache_enabled {
            self.store(text, generation, &expression);
        }
        Ok(expression)
    }

    /// Insert a result, evicting first when the cache is full.
    fn store(&self, text: &str, generation: u64, expression: &Expression) {
        let capacity = self.context.cache_capacity;
        if capacity == 0 {
            return;
        }
        if self.cache.len() >= capacity && !self.cache.contains_key(text) {
            self.cache.retain(|_, entry| entry.generation == generation);
            while self.cache.len() >= capacity {
                let Some(victim) = self.cache.iter().next().map(|e| e.key().clone()) else {
                    break;
                };
                self.cache.remove(&victim);
            }
            debug!(len = self.cache.len(), capacity, "parse cache evicted");
        }
        self.cache.insert(
            text.to_string(),
            CacheEntry {
                generation,
                expression: expression.clone(),
            },
        );
    }

    /// Number of cached parse results.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached parse result.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_empty_input() {
        let parser = ExpressionParser::default();
        let expr = parser.parse("").unwrap();
        assert_eq!(expr.value(), Some(&Value::string("")));
        assert_eq!(parser.cached_len(), 0);
    }

    #[test]
    fn test_cache_fills_and_clears() {
        let parser = ExpressionParser::default();
        parser.parse("1 + 2").unwrap();
        parser.parse("1 + 2").unwrap();
        assert_eq!(parser.cached_len(), 1);
        parser.clear_cache();
        assert_eq!(parser.cached_len(), 0);
    }

    #[test]
    fn test_cache_disabled() {
        let parser = ExpressionParser::with_context(
            Arc::new(EvaluatorRegistry::new()),
            ParseContext::default().with_cache(false),
        );
        parser.parse("1 + 2").unwrap();
        assert_eq!(parser.cached_len(), 0);
    }

    #[test]
    fn test_cache_stays_within_capacity() {
        let parser = ExpressionParser::with_context(
            Arc::new(EvaluatorRegistry::new()),
            ParseContext::default().with_cache_capacity(8),
        );
        for i in 0..100 {
            parser.parse(&format!("a + {}", i)).unwrap();
            assert!(parser.cached_len() <= 8);
        }
        assert_eq!(parser.cached_len(), 8);
    }

    #[test]
    fn test_cache_eviction_drops_stale_entries_first() {
        let registry = Arc::new(EvaluatorRegistry::new());
        let parser = ExpressionParser::with_context(
            Arc::clone(&registry),
            ParseContext::default().with_cache_capacity(2),
        );
        parser.parse("1 + 2").unwrap();
        parser.parse("1 - 2").unwrap();
        registry.register("plus", registry.lookup("+").unwrap());

        parser.parse("a").unwrap();
        assert_eq!(parser.cached_len(), 1);
    }

    #[test]
    fn test_zero_capacity_caches_nothing() {
        let parser = ExpressionParser::with_context(
            Arc::new(EvaluatorRegistry::new()),
            ParseContext::default().with_cache_capacity(0),
        );
        parser.parse("1 + 2").unwrap();
        assert_eq!(parser.cached_len(), 0);
    }

    #[test]
    fn test_repeated_parses_release_source_positions() {
        let parser = ExpressionParser::with_context(
            Arc::new(EvaluatorRegistry::new()),
            ParseContext::default().with_cache(false),
        );
        for _ in 0..1000 {
            parser.parse("a + (b - 1)").unwrap();
        }
        let err = parser.parse("1 * 2").unwrap_err();
        assert_eq!(err.location(), Some(crate::SourceLocation::new(1, 3)));

        // The next string handed to the grammar starts at the first position.
        let ident: syn::Ident = syn::parse_str("x").unwrap();
        assert_eq!(format!("{:?}", ident.span()), "bytes(1..2)");
        proc_macro2::extra::invalidate_current_thread_spans();
    }

    #[test]
    fn test_failures_are_not_cached() {
        let parser = ExpressionParser::default();
        assert!(parser.parse("1 * 2").is_err());
        assert_eq!(parser.cached_len(), 0);
    }
}
