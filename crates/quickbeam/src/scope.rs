//! Variable scope consulted by the `accessor` built-in

use indexmap::IndexMap;

use crate::Value;

/// Variables visible to an evaluation.
///
/// # Example
///
/// ```
/// use quickbeam::{Scope, Value};
///
/// let mut scope = Scope::new();
/// scope.define("x", Value::I32(1));
/// scope.define("x", Value::I32(10)); // Replaces x
///
/// assert_eq!(scope.get("x"), Some(&Value::I32(10)));
/// assert_eq!(scope.get("y"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    bindings: IndexMap<String, Value>,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope from the fields of a JSON object.
    ///
    /// Non-object JSON yields an empty scope.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Object(map) => Self {
                bindings: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            },
            _ => Self::new(),
        }
    }

    /// Bind `name`, replacing any previous binding.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the scope has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_new_is_empty() {
        let scope = Scope::new();
        assert!(scope.is_empty());
        assert_eq!(scope.len(), 0);
    }

    #[test]
    fn test_scope_from_json() {
        let scope = Scope::from_json(serde_json::json!({"a": 1, "user": {"name": "x"}}));
        assert_eq!(scope.len(), 2);
        assert_eq!(scope.get("a"), Some(&Value::I32(1)));
        assert!(scope.contains("user"));
    }

    #[test]
    fn test_scope_from_non_object_json() {
        assert!(Scope::from_json(serde_json::json!([1, 2])).is_empty());
    }
}
