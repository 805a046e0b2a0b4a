//! The per-module compatibility gate.
//!
//! One binary mode per module selects between eager annotation capture
//! (legacy: direct evaluation at declaration time) and deferred text
//! storage (the engine this crate exists for). The mode is uniform across
//! an entire module — declarations are created through the registry, so a
//! single module cannot mix modes.

use crate::error::Result;
use crate::provenance::Provenance;
use crate::store::{DeclKind, Declaration};
use annex_ast::{ExpressionText, QualifiedPath};
use annex_runtime::{Bindings, ModuleId, ModuleScope};
use indexmap::IndexMap;
use tracing::debug;

/// How a module captures annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationMode {
    /// Legacy behavior: evaluate each annotation at declaration time and
    /// store the value. Forward references fail at the declaration site.
    Eager,
    /// Store text at declaration time; evaluate on demand.
    #[default]
    Deferred,
}

/// Per-module mode table and declaration factory.
///
/// Modules not registered explicitly get [`AnnotationMode::default`]
/// (deferred).
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modes: IndexMap<ModuleId, AnnotationMode>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a module's mode, once, at module initialization.
    pub fn register_module(&mut self, id: impl Into<ModuleId>, mode: AnnotationMode) {
        let id = id.into();
        debug!(module = %id, ?mode, "module annotation mode selected");
        self.modes.insert(id, mode);
    }

    /// The mode a module's declarations are captured under.
    pub fn mode_of(&self, id: &ModuleId) -> AnnotationMode {
        self.modes.get(id).copied().unwrap_or_default()
    }

    /// Construct a declaration with all of its annotation slots, honoring
    /// the owning module's mode.
    ///
    /// `annotations` is the producer's ordered list of
    /// `(target, expression text)` pairs. `scope` is the owning module's
    /// scope *as of the declaration site* — eager capture evaluates
    /// against it; deferred capture only records text.
    ///
    /// Any failing slot aborts the whole declaration: the error is
    /// returned and nothing is constructed.
    pub fn declare<'a>(
        &self,
        name: impl Into<QualifiedPath>,
        kind: DeclKind,
        scope: &ModuleScope,
        annotations: impl IntoIterator<Item = (&'a str, &'a str)>,
        provenance: &Provenance,
    ) -> Result<Declaration> {
        let module = scope.module().clone();
        let mode = self.mode_of(&module);
        let mut declaration = Declaration::new(name, kind, module);

        for (target, text) in annotations {
            match mode {
                AnnotationMode::Deferred => {
                    declaration.annotate(target, text, provenance)?;
                }
                AnnotationMode::Eager => {
                    declare_eager_slot(&mut declaration, target, text, provenance, scope)?;
                }
            }
        }
        Ok(declaration)
    }
}

/// Eager capture of one slot: validate, evaluate now, store the value in a
/// slot born resolved.
fn declare_eager_slot(
    declaration: &mut Declaration,
    target: &str,
    text: &str,
    provenance: &Provenance,
    scope: &ModuleScope,
) -> Result<()> {
    use crate::error::ResolveError;
    use annex_runtime::eval;

    let text = ExpressionText::new(text);
    let expr = declaration.parse_and_check(target, &text, provenance)?;

    let bindings = Bindings::new(scope, None);

    // Eager mode has no deferral: a forward reference is simply undefined
    // here and fails the declaration site
    for name in expr.free_names() {
        if !bindings.contains(name) {
            return Err(ResolveError::NameResolution {
                target: target.to_string(),
                identifier: name.to_string(),
            });
        }
    }

    let value = eval(&expr, &bindings).map_err(|source| ResolveError::Evaluation {
        target: target.to_string(),
        source,
    })?;

    declaration.push_eager_slot(
        target.to_string(),
        text,
        expr,
        bindings.fingerprint(),
        value,
    );
    Ok(())
}
