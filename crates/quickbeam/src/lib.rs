//! # Quickbeam
//!
//! The front end of a small expression language.
//!
//! Quickbeam turns expression text such as `-a + b`, `1.5` or `"hi"` into
//! an immutable expression tree whose nodes are bound to shared evaluator
//! implementations, and keeps the registry that maps operator and function
//! names to those evaluators.
//!
//! ## Architecture
//!
//! ```text
//! text → [syn grammar] → syn::Expr → [Transformer] → Expression
//!                                      ↑        ↑
//!                               Registry    Literal classifier
//! ```
//!
//! - **Grammar**: `syn`'s expression grammar tokenizes and parses the text
//! - **Transformer**: maps every syntax shape to one node construction rule
//! - **Registry**: resolves names to evaluators (`add` and `+` share one)
//! - **Literal classifier**: 32-bit, then 64-bit, then floating point
//!
//! ## Example
//!
//! ```
//! use quickbeam::{ExpressionParser, Value};
//!
//! let parser = ExpressionParser::default();
//! let expr = parser.parse("1 + 2").unwrap();
//! assert_eq!(expr.name(), "+");
//! assert_eq!(expr.to_string(), "(1 + 2)");
//! assert_eq!(expr.evaluate(&Default::default()).unwrap(), Value::I32(3));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtins;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod grammar;
pub mod literal;
pub mod parser;
pub mod registry;
pub mod scope;
pub mod syntax;
pub mod transform;
pub mod value;

// Re-export main types
pub use context::ParseContext;
pub use error::{EvalError, ParseError, Result, SourceLocation};
pub use evaluator::{same_evaluator, Arity, Evaluator, FunctionEvaluator};
pub use expression::{ExprKind, Expression};
pub use literal::NumericFallback;
pub use parser::ExpressionParser;
pub use registry::EvaluatorRegistry;
pub use scope::Scope;
pub use transform::ExpressionTransformer;
pub use value::Value;

/// Quickbeam version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
