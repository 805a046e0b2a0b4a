//! Compatibility gate tests: eager vs deferred capture.
//!
//! The mode is selected once per module and is uniform across it. Eager
//! capture is the legacy behavior (evaluate at the declaration site);
//! deferred capture is the engine's reason to exist.

use annex_resolve::{
    AnnotationMode, CaptureMode, DeclKind, ModuleRegistry, Provenance, ResolveError, resolve_all,
};
use annex_runtime::{ClassObject, ModuleScope, Value};

fn registry_with(module: &str, mode: AnnotationMode) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register_module(module, mode);
    registry
}

// =============================================================================
// Deferred capture
// =============================================================================

#[test]
fn test_deferred_tolerates_forward_reference() {
    let registry = registry_with("m", AnnotationMode::Deferred);
    let scope = ModuleScope::new("m"); // Config not defined yet

    let f = registry
        .declare(
            "f",
            DeclKind::Function,
            &scope,
            [("arg", "Config")],
            &Provenance::module_level(),
        )
        .unwrap();

    assert_eq!(f.slots()[0].capture_mode(), CaptureMode::Deferred);

    // Resolution picks up the definition that happened after declaration
    let mut scope = scope;
    scope.bind("Config", Value::class(ClassObject::new("m.Config")));
    let resolved = resolve_all(&f, &scope, None).unwrap();
    assert_eq!(
        resolved["arg"],
        Value::class(ClassObject::new("m.Config"))
    );
}

#[test]
fn test_unregistered_module_defaults_to_deferred() {
    let registry = ModuleRegistry::new();
    let scope = ModuleScope::new("never_registered");

    let f = registry
        .declare(
            "f",
            DeclKind::Function,
            &scope,
            [("arg", "NotYetDefined")],
            &Provenance::module_level(),
        )
        .unwrap();
    assert_eq!(f.slots()[0].capture_mode(), CaptureMode::Deferred);
}

// =============================================================================
// Eager capture
// =============================================================================

#[test]
fn test_eager_captures_declaration_time_value() {
    let registry = registry_with("legacy", AnnotationMode::Eager);

    let mut scope = ModuleScope::new("legacy");
    scope.bind("width", Value::Int(2));

    let d = registry
        .declare(
            "x",
            DeclKind::Variable,
            &scope,
            [("x", "width * 10")],
            &Provenance::module_level(),
        )
        .unwrap();
    assert_eq!(d.slots()[0].capture_mode(), CaptureMode::Eager);

    // Later module execution rebinds `width`; the captured value is frozen
    scope.bind("width", Value::Int(999));
    let resolved = resolve_all(&d, &scope, None).unwrap();
    assert_eq!(resolved["x"], Value::Int(20));
}

#[test]
fn test_eager_forward_reference_fails_at_declaration() {
    let registry = registry_with("legacy", AnnotationMode::Eager);
    let scope = ModuleScope::new("legacy"); // Config defined later — too late

    let error = registry
        .declare(
            "f",
            DeclKind::Function,
            &scope,
            [("arg", "Config")],
            &Provenance::module_level(),
        )
        .unwrap_err();
    assert_eq!(
        error,
        ResolveError::NameResolution {
            target: "arg".to_string(),
            identifier: "Config".to_string(),
        }
    );
}

#[test]
fn test_eager_evaluation_fault_fails_at_declaration() {
    let registry = registry_with("legacy", AnnotationMode::Eager);
    let scope = ModuleScope::new("legacy");

    let error = registry
        .declare(
            "x",
            DeclKind::Variable,
            &scope,
            [("x", "1/0")],
            &Provenance::module_level(),
        )
        .unwrap_err();
    assert!(matches!(error, ResolveError::Evaluation { .. }));
}

#[test]
fn test_eager_still_validates_syntax_and_policy() {
    let registry = registry_with("legacy", AnnotationMode::Eager);
    let scope = ModuleScope::new("legacy");

    let syntax = registry
        .declare(
            "x",
            DeclKind::Variable,
            &scope,
            [("x", "List[")],
            &Provenance::module_level(),
        )
        .unwrap_err();
    assert!(matches!(syntax, ResolveError::Syntax { .. }));

    let policy = registry
        .declare(
            "x",
            DeclKind::Variable,
            &scope,
            [("x", "tmp")],
            &Provenance::module_level().with_function_locals(["tmp"]),
        )
        .unwrap_err();
    assert!(matches!(policy, ResolveError::Policy { .. }));
}

// =============================================================================
// Uniformity and abort semantics
// =============================================================================

#[test]
fn test_mode_is_uniform_within_a_module() {
    let registry = registry_with("m", AnnotationMode::Eager);
    let mut scope = ModuleScope::new("m");
    scope.bind("x", Value::Int(1));

    // Every declaration created through the registry for this module is
    // eager; there is no per-declaration override
    for name in ["a", "b", "c"] {
        let d = registry
            .declare(
                name,
                DeclKind::Variable,
                &scope,
                [(name, "x")],
                &Provenance::module_level(),
            )
            .unwrap();
        assert_eq!(d.slots()[0].capture_mode(), CaptureMode::Eager);
    }
}

#[test]
fn test_failing_slot_aborts_whole_declaration() {
    let registry = registry_with("m", AnnotationMode::Deferred);
    let scope = ModuleScope::new("m");

    // Second slot has a syntax error; the declaration never materializes
    let error = registry
        .declare(
            "f",
            DeclKind::Function,
            &scope,
            [("a", "int"), ("b", "List[")],
            &Provenance::module_level(),
        )
        .unwrap_err();
    assert!(matches!(error, ResolveError::Syntax { .. }));
}

#[test]
fn test_modes_differ_between_modules() {
    let mut registry = ModuleRegistry::new();
    registry.register_module("old", AnnotationMode::Eager);
    registry.register_module("new", AnnotationMode::Deferred);

    let mut old_scope = ModuleScope::new("old");
    old_scope.bind("x", Value::Int(1));
    let new_scope = ModuleScope::new("new");

    let old_decl = registry
        .declare(
            "a",
            DeclKind::Variable,
            &old_scope,
            [("a", "x")],
            &Provenance::module_level(),
        )
        .unwrap();
    let new_decl = registry
        .declare(
            "b",
            DeclKind::Variable,
            &new_scope,
            [("b", "x")], // unresolvable now, fine in deferred mode
            &Provenance::module_level(),
        )
        .unwrap();

    assert_eq!(old_decl.slots()[0].capture_mode(), CaptureMode::Eager);
    assert_eq!(new_decl.slots()[0].capture_mode(), CaptureMode::Deferred);
}
