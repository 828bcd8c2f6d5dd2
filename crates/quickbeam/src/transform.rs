//! Tree transformer
//!
//! Walks the concrete syntax tree produced by the grammar and builds the
//! expression tree, binding every operator and function name through the
//! registry and every atom through the literal classifier.

use tracing::trace;

use crate::error::{ParseError, Result, SourceLocation};
use crate::literal::{classify_number, classify_string};
use crate::registry::{ACCESSOR, CREATE_ARRAY, ELEMENT};
use crate::syntax::{location, source_text, SyntaxShape};
use crate::{EvaluatorRegistry, Expression, ParseContext, Value};

/// Prefix operators desugared into a binary application over zero.
const SIGN_OPERATORS: [&str; 2] = ["+", "-"];

/// Builds [`Expression`] trees from `syn` syntax trees.
pub struct ExpressionTransformer<'r> {
    registry: &'r EvaluatorRegistry,
    context: &'r ParseContext,
}

impl<'r> ExpressionTransformer<'r> {
    /// Create a transformer over a registry and a context.
    pub fn new(registry: &'r EvaluatorRegistry, context: &'r ParseContext) -> Self {
        Self { registry, context }
    }

    /// Transform a whole input (the top-level entry).
    ///
    /// A sign leading the whole input is the root's prefix production and
    /// goes through the same desugar as any nested prefix operator.
    pub fn transform(&self, root: &syn::Expr) -> Result<Expression> {
        self.visit(root, 0)
    }

    fn visit(&self, expr: &syn::Expr, depth: usize) -> Result<Expression> {
        if depth > self.context.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.context.max_depth,
                location: Some(location(expr)),
            });
        }
        let depth = depth + 1;

        match SyntaxShape::of(expr) {
            SyntaxShape::Unary {
                op,
                op_location,
                operand,
            } => {
                let operand = self.visit(operand, depth)?;
                self.prefix_application(&op, operand, op_location)
            }

            SyntaxShape::Binary {
                left,
                op,
                op_location,
                right,
            } => {
                let left = self.visit(left, depth)?;
                let right = self.visit(right, depth)?;
                self.make_expression(&op, vec![left, right], op_location)
            }

            SyntaxShape::NumericAtom(text) => classify_number(&text, self.context.numeric_fallback)
                .map(Expression::constant)
                .map_err(|e| e.with_location(location(expr))),

            SyntaxShape::StringAtom(raw) => classify_string(&raw)
                .map(Expression::constant)
                .map_err(|e| e.with_location(location(expr))),

            SyntaxShape::BoolAtom(b) => Ok(Expression::constant(b)),

            SyntaxShape::NullAtom => Ok(Expression::constant(Value::Null)),

            SyntaxShape::IdAtom(name) => self.make_expression(
                ACCESSOR,
                vec![Expression::constant(name)],
                location(expr),
            ),

            SyntaxShape::FuncInvoke { name, args } => {
                let children = args
                    .iter()
                    .map(|arg| self.visit(arg, depth))
                    .collect::<Result<Vec<_>>>()?;
                self.make_expression(&name, children, location(expr))
            }

            SyntaxShape::MemberAccess { instance, property } => {
                let instance = self.visit(instance, depth)?;
                self.make_expression(
                    ACCESSOR,
                    vec![Expression::constant(property), instance],
                    location(expr),
                )
            }

            SyntaxShape::IndexAccess { instance, index } => {
                let instance = self.visit(instance, depth)?;
                let index = self.visit(index, depth)?;
                self.make_expression(ELEMENT, vec![instance, index], location(expr))
            }

            SyntaxShape::Parenthesis(inner) => self.visit(inner, depth),

            SyntaxShape::ArrayCreation(items) => {
                let children = items
                    .iter()
                    .map(|item| self.visit(item, depth))
                    .collect::<Result<Vec<_>>>()?;
                self.make_expression(CREATE_ARRAY, children, location(expr))
            }

            SyntaxShape::Unsupported(kind) => Err(ParseError::UnsupportedSyntax {
                kind: kind.to_string(),
                source_text: source_text(expr),
                location: Some(location(expr)),
            }),
        }
    }

    /// Build a prefix operator application.
    ///
    /// `+x` and `-x` become the binary `0 + x` and `0 - x`; every other
    /// prefix operator applies to its single operand.
    fn prefix_application(
        &self,
        op: &str,
        operand: Expression,
        op_location: SourceLocation,
    ) -> Result<Expression> {
        if SIGN_OPERATORS.contains(&op) {
            self.make_expression(op, vec![Expression::constant(0), operand], op_location)
        } else {
            self.make_expression(op, vec![operand], op_location)
        }
    }

    /// Resolve `name` and apply its evaluator to `children`.
    fn make_expression(
        &self,
        name: &str,
        children: Vec<Expression>,
        at: SourceLocation,
    ) -> Result<Expression> {
        let evaluator = self
            .registry
            .lookup(name)
            .ok_or_else(|| ParseError::UnknownFunction {
                name: name.to_string(),
                location: Some(at),
            })?;
        trace!(name, children = children.len(), "binding evaluator");
        Expression::apply(evaluator, children).map_err(|e| e.with_location(at))
    }
}
