//! Name to evaluator registry
//!
//! The registry is the only authority for name resolution. It is an
//! explicitly constructed object shared through `Arc`, never global state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::builtins::{Accessor, Add, And, CreateArray, Element, Subtract};
use crate::evaluator::Evaluator;

/// Name under which identifier and member access nodes are bound.
pub const ACCESSOR: &str = "accessor";

/// Name under which index access nodes are bound.
pub const ELEMENT: &str = "element";

/// Name under which array literal nodes are bound.
pub const CREATE_ARRAY: &str = "createArray";

/// Case-sensitive mapping from names to shared evaluators.
///
/// Lookups may run concurrently with registration; a lookup never sees a
/// partially inserted entry.
///
/// # Example
///
/// ```
/// use quickbeam::EvaluatorRegistry;
///
/// let registry = EvaluatorRegistry::new();
/// let plus = registry.lookup("+").unwrap();
/// let add = registry.lookup("add").unwrap();
/// assert!(quickbeam::same_evaluator(&plus, &add));
/// assert!(registry.lookup("*").is_none());
/// ```
pub struct EvaluatorRegistry {
    table: DashMap<String, Arc<dyn Evaluator>>,
    generation: AtomicU64,
}

impl Default for EvaluatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluatorRegistry")
            .field("names", &self.names())
            .field("generation", &self.generation())
            .finish()
    }
}

impl EvaluatorRegistry {
    /// Create a registry holding the built-in evaluators.
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.load_builtins();
        registry
    }

    /// Create a registry with no entries at all.
    pub fn empty() -> Self {
        Self {
            table: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Register the built-in evaluators.
    ///
    /// Symbol and word forms share one instance.
    pub fn load_builtins(&self) {
        // Math aliases
        self.register_aliases(&["add", "+"], Arc::new(Add));
        self.register_aliases(&["subtract", "-"], Arc::new(Subtract));

        // Logic aliases
        self.register_aliases(&["and", "&&"], Arc::new(And));

        // Structural
        self.register(ACCESSOR, Arc::new(Accessor));
        self.register(ELEMENT, Arc::new(Element));
        self.register(CREATE_ARRAY, Arc::new(CreateArray));
    }

    /// Bind `name` to `evaluator`, returning the evaluator it replaced.
    pub fn register(
        &self,
        name: impl Into<String>,
        evaluator: Arc<dyn Evaluator>,
    ) -> Option<Arc<dyn Evaluator>> {
        let name = name.into();
        debug!(name = %name, evaluator = evaluator.name(), "registering evaluator");
        let previous = self.table.insert(name, evaluator);
        self.generation.fetch_add(1, Ordering::Release);
        previous
    }

    /// Bind every name in `names` to the same evaluator instance.
    pub fn register_aliases(&self, names: &[&str], evaluator: Arc<dyn Evaluator>) {
        for name in names {
            self.register(*name, Arc::clone(&evaluator));
        }
    }

    /// Remove the binding for `name`.
    pub fn remove(&self, name: &str) -> Option<Arc<dyn Evaluator>> {
        let removed = self.table.remove(name).map(|(_, evaluator)| evaluator);
        if removed.is_some() {
            debug!(name, "removed evaluator");
            self.generation.fetch_add(1, Ordering::Release);
        }
        removed
    }

    /// Resolve `name` to its evaluator.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Evaluator>> {
        self.table.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no name is bound.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// All bound names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// Mutation counter, bumped by every registration or removal.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
