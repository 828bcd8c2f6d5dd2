//! Literal classification
//!
//! Turns the raw text of numeric and string atoms into constant values.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ParseError, Result};
use crate::Value;

/// What to do with a numeric atom that fits no numeric tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericFallback {
    /// Fail the parse with [`ParseError::InvalidNumber`].
    #[default]
    Reject,

    /// Substitute the constant zero and log a warning.
    Zero,
}

/// Classify numeric text: 32-bit integer, else 64-bit integer, else float.
///
/// Parsing is radix 10 with a dot decimal separator, independent of locale.
///
/// # Example
///
/// ```
/// use quickbeam::literal::{classify_number, NumericFallback};
/// use quickbeam::Value;
///
/// assert_eq!(classify_number("42", NumericFallback::Reject).unwrap(), Value::I32(42));
/// assert_eq!(
///     classify_number("9999999999", NumericFallback::Reject).unwrap(),
///     Value::I64(9_999_999_999)
/// );
/// assert_eq!(classify_number("3.14", NumericFallback::Reject).unwrap(), Value::F64(3.14));
/// assert!(classify_number("0x10", NumericFallback::Reject).is_err());
/// ```
pub fn classify_number(text: &str, fallback: NumericFallback) -> Result<Value> {
    if let Ok(n) = text.parse::<i32>() {
        return Ok(Value::I32(n));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::I64(n));
    }
    if let Ok(n) = text.parse::<f64>() {
        return Ok(Value::F64(n));
    }

    match fallback {
        NumericFallback::Reject => Err(ParseError::InvalidNumber {
            text: text.to_string(),
            location: None,
        }),
        NumericFallback::Zero => {
            warn!(text, "numeric literal fits no numeric type, using 0");
            Ok(Value::I32(0))
        }
    }
}

/// Strip the outer quotes of a string atom and un-escape the quote it uses.
///
/// Only the escaped form of the enclosing quote character is rewritten:
/// `\'` inside single quotes, `\"` inside double quotes.
pub fn classify_string(raw: &str) -> Result<Value> {
    for (quote, escaped) in [('\'', "\\'"), ('"', "\\\"")] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            let inner = &raw[1..raw.len() - 1];
            return Ok(Value::string(inner.replace(escaped, &quote.to_string())));
        }
    }

    Err(ParseError::InvalidString {
        text: raw.to_string(),
        location: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i32_boundaries() {
        let max = i32::MAX.to_string();
        let min = i32::MIN.to_string();
        assert_eq!(classify_number(&max, NumericFallback::Reject).unwrap(), Value::I32(i32::MAX));
        assert_eq!(classify_number(&min, NumericFallback::Reject).unwrap(), Value::I32(i32::MIN));
    }

    #[test]
    fn test_just_past_i32_is_i64() {
        let text = (i64::from(i32::MAX) + 1).to_string();
        assert_eq!(
            classify_number(&text, NumericFallback::Reject).unwrap(),
            Value::I64(i64::from(i32::MAX) + 1)
        );
    }

    #[test]
    fn test_past_i64_is_float() {
        let value = classify_number("99999999999999999999", NumericFallback::Reject).unwrap();
        assert_eq!(value, Value::F64(1e20));
    }

    #[test]
    fn test_exponent_is_float() {
        assert_eq!(classify_number("1e3", NumericFallback::Reject).unwrap(), Value::F64(1000.0));
    }

    #[test]
    fn test_reject_policy() {
        let err = classify_number("1_000", NumericFallback::Reject).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { ref text, .. } if text == "1_000"));
    }

    #[test]
    fn test_zero_policy() {
        assert_eq!(classify_number("12abc", NumericFallback::Zero).unwrap(), Value::I32(0));
    }

    #[test]
    fn test_single_quoted() {
        assert_eq!(classify_string(r"'it\'s'").unwrap(), Value::string("it's"));
    }

    #[test]
    fn test_double_quoted() {
        assert_eq!(classify_string(r#""say \"hi\"""#).unwrap(), Value::string("say \"hi\""));
    }

    #[test]
    fn test_other_quote_left_alone() {
        assert_eq!(classify_string(r#""it\'s""#).unwrap(), Value::string(r"it\'s"));
        assert_eq!(classify_string(r#"'a\"b'"#).unwrap(), Value::string(r#"a\"b"#));
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(classify_string(r#""""#).unwrap(), Value::string(""));
    }

    #[test]
    fn test_unquoted_rejected() {
        assert!(classify_string("hi").is_err());
        assert!(classify_string("\"").is_err());
        assert!(classify_string("'hi\"").is_err());
    }
}
