//! Built-in evaluators
//!
//! One type per built-in operation. The registry binds each instance under
//! its symbol and word aliases.

use crate::error::EvalError;
use crate::evaluator::{Arity, Evaluator};
use crate::value::type_name;
use crate::{Scope, Value};

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

/// Numeric addition, or concatenation when any argument is a string.
#[derive(Debug, Default)]
pub struct Add;

impl Evaluator for Add {
    fn name(&self) -> &str {
        "+"
    }

    fn call_name(&self) -> &str {
        "add"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(2)
    }

    fn evaluate(&self, args: &[Value], _scope: &Scope) -> Result<Value, EvalError> {
        check_arity(self, args)?;
        if args.iter().any(Value::is_string) {
            let text: String = args.iter().map(plain_text).collect();
            return Ok(Value::string(text));
        }
        fold(self.name(), args, i64::checked_add, |a, b| a + b)
    }
}

/// Numeric subtraction, left to right.
#[derive(Debug, Default)]
pub struct Subtract;

impl Evaluator for Subtract {
    fn name(&self) -> &str {
        "-"
    }

    fn call_name(&self) -> &str {
        "subtract"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(2)
    }

    fn evaluate(&self, args: &[Value], _scope: &Scope) -> Result<Value, EvalError> {
        check_arity(self, args)?;
        fold(self.name(), args, i64::checked_sub, |a, b| a - b)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Logic
// ═══════════════════════════════════════════════════════════════════════

/// Logical conjunction: true when every argument is truthy.
#[derive(Debug, Default)]
pub struct And;

impl Evaluator for And {
    fn name(&self) -> &str {
        "&&"
    }

    fn call_name(&self) -> &str {
        "and"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(1)
    }

    fn evaluate(&self, args: &[Value], _scope: &Scope) -> Result<Value, EvalError> {
        check_arity(self, args)?;
        Ok(Value::Bool(args.iter().all(Value::is_truthy)))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Structural
// ═══════════════════════════════════════════════════════════════════════

/// Property lookup.
///
/// `[name]` reads a scope variable; `[name, instance]` reads a field of an
/// object. Missing names and null instances yield null.
#[derive(Debug, Default)]
pub struct Accessor;

impl Evaluator for Accessor {
    fn name(&self) -> &str {
        "accessor"
    }

    fn arity(&self) -> Arity {
        Arity::range(1, 2)
    }

    fn evaluate(&self, args: &[Value], scope: &Scope) -> Result<Value, EvalError> {
        check_arity(self, args)?;
        let property = args[0].as_str().ok_or_else(|| EvalError::TypeError {
            function: self.name().to_string(),
            message: format!("property name must be a string, got {}", type_name(&args[0])),
        })?;

        match args.get(1) {
            None => Ok(scope.get(property).cloned().unwrap_or(Value::Null)),
            Some(Value::Null) => Ok(Value::Null),
            Some(Value::Object(fields)) => Ok(fields.get(property).cloned().unwrap_or(Value::Null)),
            Some(other) => Err(EvalError::TypeError {
                function: self.name().to_string(),
                message: format!("cannot read `{}` of {}", property, type_name(other)),
            }),
        }
    }
}

/// Index lookup: `[array, integer]` or `[object, string]`.
#[derive(Debug, Default)]
pub struct Element;

impl Evaluator for Element {
    fn name(&self) -> &str {
        "element"
    }

    fn arity(&self) -> Arity {
        Arity::exact(2)
    }

    fn evaluate(&self, args: &[Value], _scope: &Scope) -> Result<Value, EvalError> {
        check_arity(self, args)?;
        match (&args[0], &args[1]) {
            (Value::Null, _) => Ok(Value::Null),
            (Value::Array(items), index) if index.is_integer() => {
                let index = index.as_i64().unwrap_or(-1);
                usize::try_from(index)
                    .ok()
                    .and_then(|i| items.get(i))
                    .cloned()
                    .ok_or(EvalError::IndexOutOfBounds {
                        index,
                        len: items.len(),
                    })
            }
            (Value::Object(fields), Value::String(key)) => {
                Ok(fields.get(key.as_str()).cloned().unwrap_or(Value::Null))
            }
            (instance, index) => Err(EvalError::TypeError {
                function: self.name().to_string(),
                message: format!(
                    "cannot index {} with {}",
                    type_name(instance),
                    type_name(index)
                ),
            }),
        }
    }
}

/// Array construction from the evaluated items.
#[derive(Debug, Default)]
pub struct CreateArray;

impl Evaluator for CreateArray {
    fn name(&self) -> &str {
        "createArray"
    }

    fn arity(&self) -> Arity {
        Arity::at_least(0)
    }

    fn evaluate(&self, args: &[Value], _scope: &Scope) -> Result<Value, EvalError> {
        Ok(Value::array(args.to_vec()))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════

fn check_arity(evaluator: &dyn Evaluator, args: &[Value]) -> Result<(), EvalError> {
    let arity = evaluator.arity();
    if arity.accepts(args.len()) {
        Ok(())
    } else {
        Err(EvalError::ArityMismatch {
            name: evaluator.name().to_string(),
            expected: arity,
            got: args.len(),
        })
    }
}

/// Text of a value inside a concatenation: strings unquoted, null empty.
fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.as_str().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn fold(
    function: &str,
    args: &[Value],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    let (first, rest) = args.split_first().ok_or_else(|| EvalError::TypeError {
        function: function.to_string(),
        message: "no operands".to_string(),
    })?;
    rest.iter().try_fold(first.clone(), |acc, next| {
        arith(function, &acc, next, int_op, float_op)
    })
}

/// Apply a numeric operation, keeping the narrowest tier that holds the result.
fn arith(
    function: &str,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    let overflow = || EvalError::IntegerOverflow {
        function: function.to_string(),
    };
    if let (Value::I32(a), Value::I32(b)) = (left, right) {
        let result = int_op(i64::from(*a), i64::from(*b)).ok_or_else(overflow)?;
        return Ok(i32::try_from(result).map_or(Value::I64(result), Value::I32));
    }
    if let (Some(a), Some(b)) = (left.as_i64(), right.as_i64()) {
        return int_op(a, b).map(Value::I64).ok_or_else(overflow);
    }
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => Ok(Value::F64(float_op(a, b))),
        _ => Err(EvalError::TypeError {
            function: function.to_string(),
            message: format!(
                "expected numbers, got {} and {}",
                type_name(left),
                type_name(right)
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(evaluator: &dyn Evaluator, args: &[Value]) -> Result<Value, EvalError> {
        evaluator.evaluate(args, &Scope::new())
    }

    #[test]
    fn test_add_i32() {
        assert_eq!(eval(&Add, &[Value::I32(1), Value::I32(2)]).unwrap(), Value::I32(3));
    }

    #[test]
    fn test_add_widens_on_i32_overflow() {
        let result = eval(&Add, &[Value::I32(i32::MAX), Value::I32(1)]).unwrap();
        assert_eq!(result, Value::I64(i64::from(i32::MAX) + 1));
    }

    #[test]
    fn test_add_i64_overflow() {
        let result = eval(&Add, &[Value::I64(i64::MAX), Value::I32(1)]);
        assert!(matches!(result, Err(EvalError::IntegerOverflow { .. })));
    }

    #[test]
    fn test_add_mixed_float() {
        assert_eq!(
            eval(&Add, &[Value::I32(1), Value::F64(0.5)]).unwrap(),
            Value::F64(1.5)
        );
    }

    #[test]
    fn test_add_concatenates_strings() {
        let result = eval(&Add, &[Value::string("a"), Value::I32(1), Value::Null]).unwrap();
        assert_eq!(result, Value::string("a1"));
    }

    #[test]
    fn test_subtract_variadic() {
        let result = eval(&Subtract, &[Value::I32(10), Value::I32(3), Value::I32(2)]).unwrap();
        assert_eq!(result, Value::I32(5));
    }

    #[test]
    fn test_subtract_type_error() {
        let result = eval(&Subtract, &[Value::I32(1), Value::string("a")]);
        assert!(matches!(result, Err(EvalError::TypeError { .. })));
    }

    #[test]
    fn test_subtract_arity() {
        let result = eval(&Subtract, &[Value::I32(1)]);
        assert!(matches!(result, Err(EvalError::ArityMismatch { got: 1, .. })));
    }

    #[test]
    fn test_and() {
        assert_eq!(
            eval(&And, &[Value::Bool(true), Value::I32(0)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval(&And, &[Value::Bool(true), Value::Null]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_accessor_reads_scope() {
        let mut scope = Scope::new();
        scope.define("a", Value::I32(5));
        let result = Accessor.evaluate(&[Value::string("a")], &scope).unwrap();
        assert_eq!(result, Value::I32(5));
        let missing = Accessor.evaluate(&[Value::string("b")], &scope).unwrap();
        assert_eq!(missing, Value::Null);
    }

    #[test]
    fn test_accessor_reads_field() {
        let instance = Value::from(serde_json::json!({"name": "quickbeam"}));
        let result = eval(&Accessor, &[Value::string("name"), instance]).unwrap();
        assert_eq!(result, Value::string("quickbeam"));
    }

    #[test]
    fn test_accessor_on_scalar_fails() {
        let result = eval(&Accessor, &[Value::string("name"), Value::I32(1)]);
        assert!(matches!(result, Err(EvalError::TypeError { .. })));
    }

    #[test]
    fn test_element_array() {
        let array = Value::array(vec![Value::I32(7), Value::I32(8)]);
        assert_eq!(
            eval(&Element, &[array.clone(), Value::I32(1)]).unwrap(),
            Value::I32(8)
        );
        assert_eq!(
            eval(&Element, &[array, Value::I32(2)]).unwrap_err(),
            EvalError::IndexOutOfBounds { index: 2, len: 2 }
        );
    }

    #[test]
    fn test_element_object() {
        let object = Value::from(serde_json::json!({"k": true}));
        assert_eq!(
            eval(&Element, &[object, Value::string("k")]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_create_array() {
        assert_eq!(eval(&CreateArray, &[]).unwrap(), Value::array(vec![]));
    }
}
