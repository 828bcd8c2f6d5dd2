//! Expression tree node model
//!
//! An [`Expression`] is either a constant leaf or an evaluator applied to
//! ordered children. Nodes are immutable once built and exclusively own
//! their children; evaluators are shared by reference with the registry.

use std::fmt;
use std::sync::Arc;

use crate::error::{EvalError, ParseError, Result};
use crate::evaluator::{same_evaluator, Evaluator};
use crate::registry::{ACCESSOR, CREATE_ARRAY, ELEMENT};
use crate::{Scope, Value};

/// Name reported for constant leaves.
pub const CONSTANT: &str = "Constant";

/// The two node shapes.
#[derive(Clone)]
pub enum ExprKind {
    /// Literal leaf
    Constant(Value),

    /// Evaluator applied to children, in order
    Apply {
        /// Bound evaluator, shared with the registry
        evaluator: Arc<dyn Evaluator>,
        /// Child expressions
        children: Vec<Expression>,
    },
}

/// One node of an expression tree.
#[derive(Clone)]
pub struct Expression {
    kind: ExprKind,
}

impl Expression {
    /// Create a constant leaf.
    pub fn constant(value: impl Into<Value>) -> Self {
        Self {
            kind: ExprKind::Constant(value.into()),
        }
    }

    /// Apply `evaluator` to `children`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ArityMismatch`] if the evaluator does not accept
    /// that many children.
    pub fn apply(evaluator: Arc<dyn Evaluator>, children: Vec<Expression>) -> Result<Self> {
        let arity = evaluator.arity();
        if !arity.accepts(children.len()) {
            return Err(ParseError::ArityMismatch {
                name: evaluator.name().to_string(),
                expected: arity,
                got: children.len(),
                location: None,
            });
        }
        Ok(Self {
            kind: ExprKind::Apply {
                evaluator,
                children,
            },
        })
    }

    /// The node's shape.
    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// Operation name: the evaluator's name, or `Constant` for leaves.
    pub fn name(&self) -> &str {
        match &self.kind {
            ExprKind::Constant(_) => CONSTANT,
            ExprKind::Apply { evaluator, .. } => evaluator.name(),
        }
    }

    /// Whether this is a constant leaf.
    pub fn is_constant(&self) -> bool {
        matches!(self.kind, ExprKind::Constant(_))
    }

    /// The literal value of a constant leaf.
    pub fn value(&self) -> Option<&Value> {
        match &self.kind {
            ExprKind::Constant(value) => Some(value),
            ExprKind::Apply { .. } => None,
        }
    }

    /// The bound evaluator of an applied node.
    pub fn evaluator(&self) -> Option<&Arc<dyn Evaluator>> {
        match &self.kind {
            ExprKind::Constant(_) => None,
            ExprKind::Apply { evaluator, .. } => Some(evaluator),
        }
    }

    /// Children in order; empty for leaves.
    pub fn children(&self) -> &[Expression] {
        match &self.kind {
            ExprKind::Constant(_) => &[],
            ExprKind::Apply { children, .. } => children,
        }
    }

    /// Evaluate the tree bottom-up against `scope`.
    pub fn evaluate(&self, scope: &Scope) -> std::result::Result<Value, EvalError> {
        match &self.kind {
            ExprKind::Constant(value) => Ok(value.clone()),
            ExprKind::Apply {
                evaluator,
                children,
            } => {
                let args = children
                    .iter()
                    .map(|child| child.evaluate(scope))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                evaluator.evaluate(&args, scope)
            }
        }
    }
}

/// Structural equality: same shape, same constants, same evaluator
/// instances, equal children.
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ExprKind::Constant(a), ExprKind::Constant(b)) => a == b,
            (
                ExprKind::Apply {
                    evaluator: ea,
                    children: ca,
                },
                ExprKind::Apply {
                    evaluator: eb,
                    children: cb,
                },
            ) => same_evaluator(ea, eb) && ca == cb,
            _ => false,
        }
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Constant(value) => write!(f, "Constant({:?})", value),
            ExprKind::Apply {
                evaluator,
                children,
            } => {
                let mut tuple = f.debug_tuple(evaluator.name());
                for child in children {
                    tuple.field(child);
                }
                tuple.finish()
            }
        }
    }
}

/// Prefix operators the grammar keeps as single-child applications.
const PREFIX_OPERATORS: [&str; 2] = ["!", "*"];

/// Re-serializes the tree as expression text.
///
/// Trees built from infix, prefix, access and array syntax print back in
/// that syntax; binary applications are fully parenthesized. Every other
/// application prints in call form under the evaluator's
/// [`call_name`](Evaluator::call_name), so `and(x)` prints as `and(x)`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (evaluator, children) = match &self.kind {
            ExprKind::Constant(value) => return write!(f, "{}", value),
            ExprKind::Apply {
                evaluator,
                children,
            } => (evaluator, children.as_slice()),
        };

        match (evaluator.name(), children) {
            (ACCESSOR, [property]) => match property.value() {
                Some(Value::String(path)) => write!(f, "{}", path),
                _ => write_call(f, evaluator.call_name(), children),
            },
            (ACCESSOR, [property, instance]) => match property.value() {
                Some(Value::String(path)) => write!(f, "{}.{}", instance, path),
                _ => write_call(f, evaluator.call_name(), children),
            },
            (ELEMENT, [instance, index]) => write!(f, "{}[{}]", instance, index),
            (CREATE_ARRAY, items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            (op, [operand]) if PREFIX_OPERATORS.contains(&op) => write!(f, "{}{}", op, operand),
            (op, [left, right]) if is_symbol(op) => write!(f, "({} {} {})", left, op, right),
            _ => write_call(f, evaluator.call_name(), children),
        }
    }
}

fn is_symbol(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_alphanumeric() || c == '_')
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, children: &[Expression]) -> fmt::Result {
    write!(f, "{}(", name)?;
    write_list(f, children)?;
    write!(f, ")")
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
