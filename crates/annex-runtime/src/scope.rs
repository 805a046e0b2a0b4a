//! Per-module name scopes and effective-binding composition.
//!
//! One [`ModuleScope`] exists per module, created at module initialization
//! and mutated only by ordinary module-level execution (assignment, import,
//! definition) — never by the resolution engine. Resolution composes the
//! scope with caller-supplied extra bindings into a read-only [`Bindings`]
//! view; the extras take precedence.

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Unique identifier for a module
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(pub String);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extra bindings a call site injects on top of a module scope.
///
/// The canonical use is resolving annotations that reference the class
/// currently being defined, by explicitly passing its not-yet-bound name.
pub type ExtraBindings = IndexMap<String, Value>;

/// Distinguishes scope instances (snapshots included) for cache keying.
static NEXT_SCOPE_SERIAL: AtomicU64 = AtomicU64::new(0);

/// A module's top-level names.
///
/// Insertion order is preserved, matching the order module-level execution
/// bound the names. The scope tracks a mutation epoch and an instance
/// serial; together they identify "this scope in this state" when the
/// resolver keys its per-slot cache.
#[derive(Debug, Clone)]
pub struct ModuleScope {
    id: ModuleId,
    bindings: IndexMap<String, Value>,
    serial: u64,
    epoch: u64,
}

impl ModuleScope {
    /// Create the scope for a module at initialization.
    pub fn new(id: impl Into<ModuleId>) -> Self {
        let id = id.into();
        debug!(module = %id, "module scope created");
        Self {
            id,
            bindings: IndexMap::new(),
            serial: NEXT_SCOPE_SERIAL.fetch_add(1, Ordering::Relaxed),
            epoch: 0,
        }
    }

    /// The owning module.
    pub fn module(&self) -> &ModuleId {
        &self.id
    }

    /// Bind a top-level name.
    ///
    /// This is the host's module-execution surface — assignment, import,
    /// definition. Rebinding an existing name replaces it in place.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
        self.epoch += 1;
    }

    /// Remove a top-level name (e.g. `del` at module level).
    pub fn unbind(&mut self, name: &str) -> Option<Value> {
        let removed = self.bindings.shift_remove(name);
        if removed.is_some() {
            self.epoch += 1;
        }
        removed
    }

    /// Look up a top-level name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Whether a top-level name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Names in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no names are bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Freeze the current state as an independent scope.
    ///
    /// The snapshot gets its own serial: resolving against it never shares
    /// cache entries with the live scope (Scenario: resolving against a
    /// pre-definition snapshot must not see later bindings).
    pub fn snapshot(&self) -> Self {
        Self {
            id: self.id.clone(),
            bindings: self.bindings.clone(),
            serial: NEXT_SCOPE_SERIAL.fetch_add(1, Ordering::Relaxed),
            epoch: self.epoch,
        }
    }

    /// Mutation count; bumps on every bind/unbind.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Instance identity; distinct for every created scope and snapshot.
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

/// Effective bindings for one resolution: a module scope overlaid with
/// caller-supplied extras. Extras win on name collisions.
///
/// The view is read-only; resolution cannot mutate either layer through it.
pub struct Bindings<'b> {
    scope: &'b ModuleScope,
    extra: Option<&'b ExtraBindings>,
}

impl<'b> Bindings<'b> {
    /// Compose a scope with optional extras.
    pub fn new(scope: &'b ModuleScope, extra: Option<&'b ExtraBindings>) -> Self {
        Self { scope, extra }
    }

    /// Look up a name: extras first, then the module scope.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        if let Some(extra) = self.extra {
            if let Some(value) = extra.get(name) {
                return Some(value);
            }
        }
        self.scope.get(name)
    }

    /// Whether a name is visible.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Fingerprint of the whole binding set.
    ///
    /// Covers the scope's identity and mutation epoch plus every extra
    /// binding's name and value fingerprint. Two resolutions with equal
    /// fingerprints see identical effective bindings, so a cached result
    /// keyed on this is safe to reuse.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.scope.serial.hash(&mut hasher);
        self.scope.epoch.hash(&mut hasher);
        if let Some(extra) = self.extra {
            extra.len().hash(&mut hasher);
            for (name, value) in extra {
                name.hash(&mut hasher);
                value.fingerprint(&mut hasher);
            }
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ClassObject;

    #[test]
    fn test_bind_and_get() {
        let mut scope = ModuleScope::new("mymodule");
        scope.bind("x", Value::Int(1));
        assert_eq!(scope.get("x"), Some(&Value::Int(1)));
        assert!(scope.contains("x"));
        assert!(!scope.contains("y"));
    }

    #[test]
    fn test_binding_order_preserved() {
        let mut scope = ModuleScope::new("m");
        scope.bind("b", Value::Int(1));
        scope.bind("a", Value::Int(2));
        let names: Vec<_> = scope.names().collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut scope = ModuleScope::new("m");
        scope.bind("x", Value::Int(1));
        let snap = scope.snapshot();
        scope.bind("y", Value::Int(2));

        assert!(scope.contains("y"));
        assert!(!snap.contains("y"));
        assert_ne!(scope.serial(), snap.serial());
    }

    #[test]
    fn test_extras_take_precedence() {
        let mut scope = ModuleScope::new("m");
        scope.bind("x", Value::Int(1));

        let mut extra = ExtraBindings::new();
        extra.insert("x".to_string(), Value::Int(99));

        let bindings = Bindings::new(&scope, Some(&extra));
        assert_eq!(bindings.lookup("x"), Some(&Value::Int(99)));
    }

    #[test]
    fn test_extras_fall_through_to_scope() {
        let mut scope = ModuleScope::new("m");
        scope.bind("x", Value::Int(1));

        let extra = ExtraBindings::new();
        let bindings = Bindings::new(&scope, Some(&extra));
        assert_eq!(bindings.lookup("x"), Some(&Value::Int(1)));
        assert!(bindings.lookup("missing").is_none());
    }

    #[test]
    fn test_fingerprint_changes_on_mutation() {
        let mut scope = ModuleScope::new("m");
        let before = Bindings::new(&scope, None).fingerprint();
        scope.bind("x", Value::Int(1));
        let after = Bindings::new(&scope, None).fingerprint();
        assert_ne!(before, after);
    }

    #[test]
    fn test_fingerprint_covers_extras() {
        let scope = ModuleScope::new("m");

        let mut extra_a = ExtraBindings::new();
        extra_a.insert("C".to_string(), Value::class(ClassObject::new("m.C")));
        let mut extra_b = ExtraBindings::new();
        extra_b.insert("C".to_string(), Value::class(ClassObject::new("m.D")));

        let fp_a = Bindings::new(&scope, Some(&extra_a)).fingerprint();
        let fp_b = Bindings::new(&scope, Some(&extra_b)).fingerprint();
        let fp_a2 = Bindings::new(&scope, Some(&extra_a)).fingerprint();

        assert_ne!(fp_a, fp_b);
        assert_eq!(fp_a, fp_a2);
    }

    #[test]
    fn test_snapshot_fingerprint_differs_from_live() {
        let mut scope = ModuleScope::new("m");
        scope.bind("x", Value::Int(1));
        let snap = scope.snapshot();

        let fp_live = Bindings::new(&scope, None).fingerprint();
        let fp_snap = Bindings::new(&snap, None).fingerprint();
        assert_ne!(fp_live, fp_snap);
    }
}
