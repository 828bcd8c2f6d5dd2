//! Property-based tests for literal classification and parse stability

use proptest::prelude::*;
use quickbeam::*;

proptest! {
    #[test]
    fn prop_i32_literal_is_i32_constant(n in 0..=i32::MAX) {
        let expr = ExpressionParser::default().parse(&n.to_string()).unwrap();
        prop_assert_eq!(expr.value(), Some(&Value::I32(n)));
    }

    #[test]
    fn prop_wide_literal_is_i64_constant(n in (i32::MAX as i64 + 1)..=i64::MAX) {
        let expr = ExpressionParser::default().parse(&n.to_string()).unwrap();
        prop_assert_eq!(expr.value(), Some(&Value::I64(n)));
    }

    #[test]
    fn prop_negated_i32_evaluates_to_same_integer(n in (i32::MIN + 1)..0) {
        let expr = ExpressionParser::default().parse(&n.to_string()).unwrap();
        prop_assert_eq!(expr.name(), "-");
        prop_assert_eq!(expr.evaluate(&Scope::new()).unwrap(), Value::I32(n));
    }

    #[test]
    fn prop_sum_matches_integer_addition(a in 0..10_000i32, b in 0..10_000i32) {
        let expr = ExpressionParser::default().parse(&format!("{} + {}", a, b)).unwrap();
        prop_assert_eq!(expr.evaluate(&Scope::new()).unwrap(), Value::I32(a + b));
    }

    #[test]
    fn prop_parse_is_idempotent(
        names in prop::collection::vec("[a-z][a-z0-9_]{0,6}", 1..5),
        n in 0..1000i32,
    ) {
        prop_assume!(names.iter().all(|name| syn::parse_str::<syn::Ident>(name).is_ok()));
        let src = format!("{} - {}", names.join(" + "), n);

        let cached = ExpressionParser::default();
        let first = cached.parse(&src).unwrap();
        let second = cached.parse(&src).unwrap();
        prop_assert_eq!(&first, &second);

        let fresh = ExpressionParser::default().parse(&src).unwrap();
        prop_assert_eq!(first, fresh);
    }

    #[test]
    fn prop_display_reparses_to_equal_tree(a in 0..1000i32, b in 0..1000i32, s in "[a-z ]{0,8}") {
        let parser = ExpressionParser::default();
        let expr = parser.parse(&format!("[-{}, x.y[{}], \"{}\"] && z", a, b, s)).unwrap();
        let reparsed = parser.parse(&expr.to_string()).unwrap();
        prop_assert_eq!(reparsed, expr);
    }
}
