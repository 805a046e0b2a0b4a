//! On-demand resolution
//!
//! Evaluates stored annotation expressions against an explicit module
//! scope, optionally extended with caller-supplied extra bindings.
//!
//! # What This Pass Does
//!
//! 1. **Composes effective bindings** - module scope overlaid with extras
//!    (extras win)
//! 2. **Free-name pre-pass** - the first identifier absent from the
//!    effective bindings fails the slot before anything executes
//! 3. **Evaluates** - pure expression evaluation over the binding set
//! 4. **Caches** - outcome recorded on the slot, keyed by the binding
//!    fingerprint
//!
//! # What This Pass Does NOT Do
//!
//! - **No scope mutation** - `ModuleScope` is read-only here
//! - **No partial results** - `resolve_all` fails fast on the first bad
//!   slot and never returns a partially-populated mapping
//!
//! # Ordering
//!
//! `resolve_all` walks slots strictly in declaration order, sequentially.
//! Evaluation can have observable side effects (native callables), and
//! callers expect deterministic, source-order sequencing of those effects.

use crate::error::{ResolveError, Result};
use crate::store::{AnnotationSlot, Declaration};
use annex_runtime::{Bindings, ExtraBindings, ModuleScope, Value, eval};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Resolve one slot against a scope (plus optional extras).
///
/// Resolution is a pure function of `(text, effective bindings)`: the
/// per-slot cache is consulted only when the binding fingerprint matches
/// the one the cached outcome was computed under; anything else
/// re-evaluates and overwrites.
///
/// # Errors
/// - [`ResolveError::NameResolution`] naming the first free identifier
///   absent from the effective bindings
/// - [`ResolveError::Evaluation`] wrapping the fault of a referentially
///   valid expression that raised
pub fn resolve(
    slot: &AnnotationSlot,
    scope: &ModuleScope,
    extra: Option<&ExtraBindings>,
) -> Result<Value> {
    // Eager capture froze the value at declaration time; the current
    // scope does not participate
    if let Some(value) = slot.eager_value() {
        trace!(
            owner = %slot.owner(),
            slot = slot.target(),
            "eager slot, returning captured value"
        );
        return Ok(value);
    }

    let bindings = Bindings::new(scope, extra);
    let fingerprint = bindings.fingerprint();

    if let Some(outcome) = slot.cached_for(fingerprint) {
        trace!(
            owner = %slot.owner(),
            slot = slot.target(),
            "slot cache hit"
        );
        return outcome;
    }

    // Pre-pass: first unresolved free identifier, in source order
    for name in slot.expr().free_names() {
        if !bindings.contains(name) {
            let error = ResolveError::NameResolution {
                target: slot.target().to_string(),
                identifier: name.to_string(),
            };
            let outcome = Err(error);
            slot.record(fingerprint, &outcome);
            return outcome;
        }
    }

    let outcome = eval(slot.expr(), &bindings).map_err(|source| {
        debug!(
            owner = %slot.owner(),
            slot = slot.target(),
            fault = %source,
            "annotation evaluation faulted"
        );
        ResolveError::Evaluation {
            target: slot.target().to_string(),
            source,
        }
    });

    slot.record(fingerprint, &outcome);
    outcome
}

/// Resolve every slot of a declaration, atomically and in declaration
/// order.
///
/// The first failing slot aborts the whole call; no partial mapping is
/// returned. A caller consuming "all annotations resolved" cannot safely
/// proceed with a partially resolved set.
///
/// The returned mapping iterates in declaration order.
pub fn resolve_all(
    declaration: &Declaration,
    scope: &ModuleScope,
    extra: Option<&ExtraBindings>,
) -> Result<IndexMap<String, Value>> {
    debug!(
        declaration = %declaration.name(),
        module = %declaration.module(),
        slots = declaration.slots().len(),
        "resolving all annotations"
    );

    let mut resolved = IndexMap::with_capacity(declaration.slots().len());
    for slot in declaration.slots() {
        let value = resolve(slot, scope, extra)?;
        resolved.insert(slot.target().to_string(), value);
    }
    Ok(resolved)
}
