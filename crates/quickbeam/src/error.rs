//! Error types for parsing and evaluating expressions

use std::fmt;

use thiserror::Error;

use crate::evaluator::Arity;

/// Source location of a syntax node, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (1-indexed, in characters)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Location where a `proc_macro2` span starts.
    pub fn from_span(span: proc_macro2::Span) -> Self {
        let start = span.start();
        Self {
            line: start.line,
            column: start.column + 1,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

fn at(location: &Option<SourceLocation>) -> String {
    match location {
        Some(loc) => format!(" at {}", loc),
        None => String::new(),
    }
}

/// Errors raised while turning text into an [`Expression`](crate::Expression).
///
/// Every variant fails the whole `parse` call; no partial tree is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The grammar rejected the input text.
    #[error("Syntax error{}: {message}", at(.location))]
    Syntax {
        /// Message reported by the grammar
        message: String,
        /// Where the grammar gave up
        location: Option<SourceLocation>,
    },

    /// An operator or function name has no registered evaluator.
    #[error(
        "`{name}` does not have an evaluator, it's not a built-in function or a custom function{}",
        at(.location)
    )]
    UnknownFunction {
        /// The unresolved name
        name: String,
        /// Where the name appeared
        location: Option<SourceLocation>,
    },

    /// A numeric atom is neither a 32-bit, 64-bit nor floating-point number.
    #[error("`{text}` is not a number{}", at(.location))]
    InvalidNumber {
        /// Raw token text
        text: String,
        /// Where the literal appeared
        location: Option<SourceLocation>,
    },

    /// A string atom is not wrapped in a matching quote pair.
    #[error("invalid string literal {text}{}", at(.location))]
    InvalidString {
        /// Raw token text
        text: String,
        /// Where the literal appeared
        location: Option<SourceLocation>,
    },

    /// The grammar produced a construct the expression language does not support.
    #[error("unsupported syntax: {kind} `{source_text}`{}", at(.location))]
    UnsupportedSyntax {
        /// Human-readable construct name
        kind: String,
        /// The offending syntax, re-rendered
        source_text: String,
        /// Where the construct appeared
        location: Option<SourceLocation>,
    },

    /// A node was built with a children count its evaluator does not accept.
    #[error("`{name}` expects {expected} argument(s), got {got}{}", at(.location))]
    ArityMismatch {
        /// Evaluator name
        name: String,
        /// Accepted arity
        expected: Arity,
        /// Children supplied
        got: usize,
        /// Where the application appeared
        location: Option<SourceLocation>,
    },

    /// Nesting exceeded the configured maximum depth.
    #[error("expression nested deeper than {limit} levels{}", at(.location))]
    TooDeep {
        /// Configured limit
        limit: usize,
        /// Where the limit was hit
        location: Option<SourceLocation>,
    },
}

impl ParseError {
    /// Attach a location, keeping an existing one if already set.
    pub fn with_location(mut self, loc: SourceLocation) -> Self {
        let slot = match &mut self {
            ParseError::Syntax { location, .. }
            | ParseError::UnknownFunction { location, .. }
            | ParseError::InvalidNumber { location, .. }
            | ParseError::InvalidString { location, .. }
            | ParseError::UnsupportedSyntax { location, .. }
            | ParseError::ArityMismatch { location, .. }
            | ParseError::TooDeep { location, .. } => location,
        };
        if slot.is_none() {
            *slot = Some(loc);
        }
        self
    }

    /// Location of the error, if known.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            ParseError::Syntax { location, .. }
            | ParseError::UnknownFunction { location, .. }
            | ParseError::InvalidNumber { location, .. }
            | ParseError::InvalidString { location, .. }
            | ParseError::UnsupportedSyntax { location, .. }
            | ParseError::ArityMismatch { location, .. }
            | ParseError::TooDeep { location, .. } => *location,
        }
    }
}

/// Errors raised while evaluating an expression tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Operand types not accepted by the evaluator
    #[error("{function}: {message}")]
    TypeError {
        /// Evaluator name
        function: String,
        /// What went wrong
        message: String,
    },

    /// Integer arithmetic overflowed 64 bits
    #[error("{function}: integer overflow")]
    IntegerOverflow {
        /// Evaluator name
        function: String,
    },

    /// Array index out of range
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: i64,
        /// Array length
        len: usize,
    },

    /// Wrong number of evaluated arguments
    #[error("`{name}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Evaluator name
        name: String,
        /// Accepted arity
        expected: Arity,
        /// Arguments supplied
        got: usize,
    },

    /// A user-supplied function failed
    #[error("`{name}` failed: {message}")]
    Function {
        /// Function name
        name: String,
        /// Error chain rendered from the function's `anyhow::Error`
        message: String,
    },
}

/// Result type alias for parse operations
pub type Result<T> = std::result::Result<T, ParseError>;
