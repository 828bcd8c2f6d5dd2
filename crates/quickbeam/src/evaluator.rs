//! The evaluator capability interface
//!
//! An evaluator is the named operation bound into an applied
//! [`Expression`](crate::Expression) node. The transformer only needs its
//! identity and arity; evaluation receives the already-evaluated children.

use std::fmt;
use std::sync::Arc;

use crate::error::EvalError;
use crate::{Scope, Value};

/// Number of children an evaluator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    min: usize,
    max: Option<usize>,
}

impl Arity {
    /// Exactly `n` children.
    pub const fn exact(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// `n` or more children.
    pub const fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    /// Between `min` and `max` children, inclusive.
    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// Minimum children count.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Maximum children count, `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Whether `count` children are acceptable.
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "exactly {}", max),
            Some(max) => write!(f, "between {} and {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// A named operation that can be bound into expression nodes.
///
/// Built-ins implement this once per operation; hosts implement it (or use
/// [`FunctionEvaluator`]) for their own functions.
pub trait Evaluator: Send + Sync {
    /// Canonical name of the operation.
    fn name(&self) -> &str;

    /// Name used when a node prints in call form, e.g. `add` for `+`.
    ///
    /// Defaults to [`name`](Evaluator::name).
    fn call_name(&self) -> &str {
        self.name()
    }

    /// Children counts the operation accepts.
    fn arity(&self) -> Arity;

    /// Apply the operation to already-evaluated children.
    ///
    /// `scope` holds the variables visible to the evaluation; most
    /// operations ignore it.
    fn evaluate(&self, args: &[Value], scope: &Scope) -> Result<Value, EvalError>;
}

impl fmt::Debug for dyn Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Evaluator({})", self.name())
    }
}

/// Whether two evaluator handles point at the same instance.
pub fn same_evaluator(a: &Arc<dyn Evaluator>, b: &Arc<dyn Evaluator>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Type alias for user function closures
pub type FunctionPtr = Arc<dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// A user-defined function backed by a closure.
///
/// # Example
///
/// ```
/// use quickbeam::{Arity, EvaluatorRegistry, FunctionEvaluator, Value};
/// use std::sync::Arc;
///
/// let registry = EvaluatorRegistry::new();
/// registry.register(
///     "len",
///     Arc::new(FunctionEvaluator::new("len", Arity::exact(1), |args| {
///         match &args[0] {
///             Value::String(s) => Ok(Value::I32(s.chars().count() as i32)),
///             other => anyhow::bail!("cannot take the length of {}", other),
///         }
///     })),
/// );
/// assert!(registry.contains("len"));
/// ```
#[derive(Clone)]
pub struct FunctionEvaluator {
    name: String,
    arity: Arity,
    func: FunctionPtr,
}

impl FunctionEvaluator {
    /// Create a function evaluator.
    pub fn new<F>(name: impl Into<String>, arity: Arity, func: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for FunctionEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionEvaluator({})", self.name)
    }
}

impl Evaluator for FunctionEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn evaluate(&self, args: &[Value], _scope: &Scope) -> Result<Value, EvalError> {
        if !self.arity.accepts(args.len()) {
            return Err(EvalError::ArityMismatch {
                name: self.name.clone(),
                expected: self.arity,
                got: args.len(),
            });
        }
        (self.func)(args).map_err(|err| EvalError::Function {
            name: self.name.clone(),
            message: format!("{:#}", err),
        })
    }
}
