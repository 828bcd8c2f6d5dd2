//! Registry and name resolution tests

use std::sync::Arc;
use std::thread;

use quickbeam::*;

fn multiply() -> Arc<dyn Evaluator> {
    Arc::new(FunctionEvaluator::new("*", Arity::exact(2), |args| {
        match (args[0].as_i64(), args[1].as_i64()) {
            (Some(a), Some(b)) => a
                .checked_mul(b)
                .map(Value::I64)
                .ok_or_else(|| anyhow::anyhow!("overflow")),
            _ => anyhow::bail!("expected integers"),
        }
    }))
}

// ═══════════════════════════════════════════════════════════════════════
// Aliases
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_new_alias_binds_same_evaluator() {
    let registry = Arc::new(EvaluatorRegistry::new());
    let parser = ExpressionParser::new(Arc::clone(&registry));

    registry.register("plus", registry.lookup("add").unwrap());

    let via_alias = parser.parse("plus(1, 2)").unwrap();
    let via_symbol = parser.parse("1 + 2").unwrap();
    assert_eq!(via_alias, via_symbol);
    assert!(same_evaluator(
        via_alias.evaluator().unwrap(),
        &registry.lookup("+").unwrap()
    ));
}

#[test]
fn test_word_and_symbol_and_share_instance() {
    let parser = ExpressionParser::default();
    assert_eq!(parser.parse("and(a, b)").unwrap(), parser.parse("a && b").unwrap());
}

// ═══════════════════════════════════════════════════════════════════════
// User Registration
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_registering_operator_enables_it() {
    let registry = Arc::new(EvaluatorRegistry::new());
    let parser = ExpressionParser::new(Arc::clone(&registry));

    assert!(parser.parse("6 * 7").is_err());
    registry.register_aliases(&["*", "multiply"], multiply());

    let expr = parser.parse("6 * 7").unwrap();
    assert_eq!(expr.evaluate(&Scope::new()).unwrap(), Value::I64(42));
    assert_eq!(parser.parse("multiply(6, 7)").unwrap(), expr);
}

#[test]
fn test_reregistering_replaces_binding_and_invalidates_cache() {
    let registry = Arc::new(EvaluatorRegistry::new());
    let parser = ExpressionParser::new(Arc::clone(&registry));

    let before = parser.parse("1 + 2").unwrap();
    registry.register("+", registry.lookup("subtract").unwrap());
    let after = parser.parse("1 + 2").unwrap();

    assert_ne!(before, after);
    assert_eq!(after.evaluate(&Scope::new()).unwrap(), Value::I32(-1));
}

#[test]
fn test_removing_name_makes_it_unknown() {
    let registry = Arc::new(EvaluatorRegistry::new());
    let parser = ExpressionParser::new(Arc::clone(&registry));

    assert!(parser.parse("a && b").is_ok());
    registry.remove("&&");
    let err = parser.parse("a && b").unwrap_err();
    assert!(matches!(err, ParseError::UnknownFunction { ref name, .. } if name == "&&"));
}

#[test]
fn test_isolated_registries() {
    let full = ExpressionParser::default();
    let empty = ExpressionParser::new(Arc::new(EvaluatorRegistry::empty()));

    assert!(full.parse("1 + 2").is_ok());
    assert!(empty.parse("1 + 2").is_err());
    // Literals need no evaluator
    assert_eq!(empty.parse("5").unwrap(), Expression::constant(5));
}

#[test]
fn test_identifier_needs_accessor() {
    let parser = ExpressionParser::new(Arc::new(EvaluatorRegistry::empty()));
    let err = parser.parse("a").unwrap_err();
    assert!(matches!(err, ParseError::UnknownFunction { ref name, .. } if name == "accessor"));
}

#[test]
fn test_user_function_error_surfaces() {
    let registry = Arc::new(EvaluatorRegistry::new());
    registry.register("*", multiply());
    let parser = ExpressionParser::new(Arc::clone(&registry));

    let expr = parser.parse("\"a\" * 2").unwrap();
    let err = expr.evaluate(&Scope::new()).unwrap_err();
    assert_eq!(
        err,
        EvalError::Function {
            name: "*".to_string(),
            message: "expected integers".to_string(),
        }
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Concurrency
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_parse_concurrently_with_registration() {
    let registry = Arc::new(EvaluatorRegistry::new());
    let parser = Arc::new(ExpressionParser::new(Arc::clone(&registry)));

    thread::scope(|s| {
        for i in 0..4 {
            let registry = Arc::clone(&registry);
            s.spawn(move || {
                for j in 0..100 {
                    registry.register(format!("f{}_{}", i, j), registry.lookup("add").unwrap());
                }
            });
        }
        for _ in 0..4 {
            let parser = Arc::clone(&parser);
            s.spawn(move || {
                for _ in 0..100 {
                    let expr = parser.parse("-a + 1").unwrap();
                    assert_eq!(expr.name(), "+");
                }
            });
        }
    });

    assert!(registry.contains("f3_99"));
    assert_eq!(
        parser.parse("f0_0(1, 2)").unwrap(),
        parser.parse("1 + 2").unwrap()
    );
}

#[test]
fn test_expressions_are_shareable_across_threads() {
    let parser = ExpressionParser::default();
    let expr = Arc::new(parser.parse("1 + 2").unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let expr = Arc::clone(&expr);
            thread::spawn(move || expr.evaluate(&Scope::new()).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Value::I32(3));
    }
}
