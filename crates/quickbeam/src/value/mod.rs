//! Value representation for constants and evaluation results

mod display;
mod impls;

pub use impls::type_name;

use std::sync::Arc;

use indexmap::IndexMap;

/// Runtime value held by constant leaves and produced by evaluation.
///
/// Literal atoms only ever produce `String`, `I32`, `I64`, `F64`, `Bool`
/// and `Null`. Arrays and objects come from evaluation (`createArray`)
/// or from a host-seeded [`Scope`](crate::Scope).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (`null`)
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// 32-bit signed integer (first numeric tier)
    I32(i32),

    /// 64-bit signed integer (second numeric tier)
    I64(i64),

    /// 64-bit floating point (last numeric tier)
    F64(f64),

    /// Heap-allocated string
    String(Arc<String>),

    /// Ordered list of values
    Array(Arc<Vec<Value>>),

    /// Object with insertion-ordered fields
    Object(Arc<IndexMap<String, Value>>),
}
