//! Declarations and their annotation slots.
//!
//! Registration stores text only — parsing happens here, evaluation never
//! does (deferred mode). A declaration that fails registration is aborted:
//! the failing slot is not pushed, and the producer is expected to discard
//! the declaration.
//!
//! # Slot lifecycle
//!
//! ```text
//! annotate() → slot {Unresolved}
//!    ↓ resolve()
//! {Resolved(value)} or {Failed(error)}, keyed by the binding fingerprint
//! ```
//!
//! The cached state is not a cross-call guarantee: a resolution under a
//! different binding fingerprint re-evaluates and overwrites.

use crate::error::{ResolveError, Result};
use crate::provenance::Provenance;
use annex_ast::{Expr, ExpressionText, QualifiedPath};
use annex_runtime::{ModuleId, Value};
use std::fmt;
use std::sync::RwLock;
use tracing::debug;

/// What kind of declaration owns the slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// A function: parameter slots plus a `"return"` slot
    Function,
    /// A module- or local-level variable
    Variable,
    /// A field declared in a class body
    ClassField,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Function => write!(f, "function"),
            DeclKind::Variable => write!(f, "variable"),
            DeclKind::ClassField => write!(f, "class-field"),
        }
    }
}

/// Resolution state of one slot.
///
/// `Resolved`/`Failed` carry the fingerprint of the binding set that
/// produced them; a lookup under any other fingerprint misses.
#[derive(Debug, Clone, Default)]
pub enum SlotState {
    /// Never resolved
    #[default]
    Unresolved,
    /// Last resolution succeeded under `fingerprint`
    Resolved {
        /// Binding-set fingerprint the value was computed under
        fingerprint: u64,
        /// The cached value
        value: Value,
    },
    /// Last resolution failed under `fingerprint`
    Failed {
        /// Binding-set fingerprint the failure occurred under
        fingerprint: u64,
        /// The cached error
        error: ResolveError,
    },
}

/// How a slot's value was captured (the owning module's mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Text stored at declaration time, evaluated on demand
    Deferred,
    /// Value evaluated at declaration time; resolution returns it as-is
    Eager,
}

/// One target-name/expression-text pair attached to a declaration.
///
/// The text and parsed tree are frozen at registration; only the guarded
/// resolution state changes afterwards. The slot records its owner's name
/// in place of a weak back-reference — slots never outlive their
/// declaration, so the name is all errors need.
#[derive(Debug)]
pub struct AnnotationSlot {
    owner: QualifiedPath,
    target: String,
    text: ExpressionText,
    expr: Expr,
    mode: CaptureMode,
    state: RwLock<SlotState>,
}

impl AnnotationSlot {
    fn new(owner: QualifiedPath, target: String, text: ExpressionText, expr: Expr) -> Self {
        Self {
            owner,
            target,
            text,
            expr,
            mode: CaptureMode::Deferred,
            state: RwLock::new(SlotState::Unresolved),
        }
    }

    /// The owning declaration's name.
    pub fn owner(&self) -> &QualifiedPath {
        &self.owner
    }

    /// The slot target (parameter name, `"return"`, or variable name).
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The stored text, verbatim.
    pub fn text(&self) -> &ExpressionText {
        &self.text
    }

    /// The parsed expression tree.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// How this slot was captured.
    pub fn capture_mode(&self) -> CaptureMode {
        self.mode
    }

    /// Current resolution state (a snapshot; the lock is not held).
    pub fn state(&self) -> SlotState {
        self.state.read().expect("slot state lock poisoned").clone()
    }

    /// The declaration-time value of an eager slot.
    ///
    /// Eager capture froze the value when the declaration executed; the
    /// resolver returns it without consulting the current scope.
    pub(crate) fn eager_value(&self) -> Option<Value> {
        if self.mode != CaptureMode::Eager {
            return None;
        }
        match &*self.state.read().expect("slot state lock poisoned") {
            SlotState::Resolved { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    /// Cached outcome for a binding fingerprint, if the last resolution
    /// used the same one.
    pub(crate) fn cached_for(&self, fingerprint: u64) -> Option<Result<Value>> {
        match &*self.state.read().expect("slot state lock poisoned") {
            SlotState::Resolved {
                fingerprint: cached,
                value,
            } if *cached == fingerprint => Some(Ok(value.clone())),
            SlotState::Failed {
                fingerprint: cached,
                error,
            } if *cached == fingerprint => Some(Err(error.clone())),
            _ => None,
        }
    }

    /// Record a resolution outcome. Single-writer-wins: whichever
    /// resolution takes the write lock last owns the cache slot.
    pub(crate) fn record(&self, fingerprint: u64, outcome: &Result<Value>) {
        let mut state = self.state.write().expect("slot state lock poisoned");
        *state = match outcome {
            Ok(value) => SlotState::Resolved {
                fingerprint,
                value: value.clone(),
            },
            Err(error) => SlotState::Failed {
                fingerprint,
                error: error.clone(),
            },
        };
    }
}

/// A declaration and its ordered annotation slots.
///
/// Created by the producer when the declaration site executes. The core
/// never mutates it except through slot registration.
#[derive(Debug)]
pub struct Declaration {
    name: QualifiedPath,
    kind: DeclKind,
    module: ModuleId,
    slots: Vec<AnnotationSlot>,
}

impl Declaration {
    /// Create a declaration with no slots.
    pub fn new(
        name: impl Into<QualifiedPath>,
        kind: DeclKind,
        module: impl Into<ModuleId>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            module: module.into(),
            slots: Vec::new(),
        }
    }

    /// The declaration's (possibly nested) name.
    pub fn name(&self) -> &QualifiedPath {
        &self.name
    }

    /// The declaration kind.
    pub fn kind(&self) -> DeclKind {
        self.kind
    }

    /// The owning module.
    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    /// Register one annotation slot (deferred capture).
    ///
    /// Validates that `text` parses as a standalone expression and that no
    /// free identifier has enclosing-local provenance. No evaluation
    /// occurs. On error nothing is stored and the declaration should be
    /// discarded by the producer.
    ///
    /// # Errors
    /// - [`ResolveError::Syntax`] if the text does not parse
    /// - [`ResolveError::Policy`] if a free identifier is enclosing-local
    pub fn annotate(
        &mut self,
        target: impl Into<String>,
        text: impl Into<ExpressionText>,
        provenance: &Provenance,
    ) -> Result<()> {
        let target = target.into();
        let text = text.into();

        let expr = self.parse_slot_text(&target, &text)?;
        self.check_policy(&target, &expr, provenance)?;

        debug!(
            declaration = %self.name,
            slot = %target,
            "annotation slot registered"
        );
        self.slots
            .push(AnnotationSlot::new(self.name.clone(), target, text, expr));
        Ok(())
    }

    /// Slots in registration order, which equals source declaration order.
    pub fn slots(&self) -> &[AnnotationSlot] {
        &self.slots
    }

    /// Find a slot by target name.
    pub fn slot(&self, target: &str) -> Option<&AnnotationSlot> {
        self.slots.iter().find(|slot| slot.target == target)
    }

    fn parse_slot_text(&self, target: &str, text: &ExpressionText) -> Result<Expr> {
        annex_parser::parse_text(text.as_str()).map_err(|source| ResolveError::Syntax {
            declaration: self.name.to_string(),
            target: target.to_string(),
            text: text.clone(),
            source,
        })
    }

    fn check_policy(&self, target: &str, expr: &Expr, provenance: &Provenance) -> Result<()> {
        for name in expr.free_names() {
            if let Some(kind) = provenance.classify(name) {
                return Err(ResolveError::Policy {
                    target: target.to_string(),
                    identifier: name.to_string(),
                    provenance: kind,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn parse_and_check(
        &self,
        target: &str,
        text: &ExpressionText,
        provenance: &Provenance,
    ) -> Result<Expr> {
        let expr = self.parse_slot_text(target, text)?;
        self.check_policy(target, &expr, provenance)?;
        Ok(expr)
    }

    pub(crate) fn push_eager_slot(
        &mut self,
        target: String,
        text: ExpressionText,
        expr: Expr,
        fingerprint: u64,
        value: Value,
    ) {
        let mut slot = AnnotationSlot::new(self.name.clone(), target, text, expr);
        slot.mode = CaptureMode::Eager;
        slot.state = RwLock::new(SlotState::Resolved { fingerprint, value });
        self.slots.push(slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProvenanceKind;

    fn decl() -> Declaration {
        Declaration::new("f", DeclKind::Function, "mymodule")
    }

    #[test]
    fn test_register_stores_text_without_evaluation() {
        let mut f = decl();
        // `missing` is not defined anywhere; registration succeeds anyway
        f.annotate("arg", "missing", &Provenance::module_level())
            .unwrap();
        assert_eq!(f.slots().len(), 1);
        assert!(matches!(f.slots()[0].state(), SlotState::Unresolved));
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut f = decl();
        let provenance = Provenance::module_level();
        f.annotate("b", "int", &provenance).unwrap();
        f.annotate("a", "str", &provenance).unwrap();
        f.annotate("return", "None", &provenance).unwrap();

        let targets: Vec<_> = f.slots().iter().map(|s| s.target()).collect();
        assert_eq!(targets, vec!["b", "a", "return"]);
    }

    #[test]
    fn test_string_literal_text_round_trips() {
        let mut f = decl();
        let raw = "Dict[ str,int ]  |None";
        f.annotate("arg", raw, &Provenance::module_level()).unwrap();
        assert_eq!(f.slots()[0].text().as_str(), raw);
    }

    #[test]
    fn test_syntax_error_aborts_registration() {
        let mut f = decl();
        let error = f
            .annotate("arg", "List[Config", &Provenance::module_level())
            .unwrap_err();
        match error {
            ResolveError::Syntax {
                declaration,
                target,
                text,
                ..
            } => {
                assert_eq!(declaration, "f");
                assert_eq!(target, "arg");
                assert_eq!(text.as_str(), "List[Config");
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
        // Nothing stored
        assert!(f.slots().is_empty());
    }

    #[test]
    fn test_policy_error_at_registration() {
        let mut f = decl();
        let provenance = Provenance::module_level().with_function_locals(["tmp"]);
        let error = f.annotate("arg", "List[tmp]", &provenance).unwrap_err();
        assert_eq!(
            error,
            ResolveError::Policy {
                target: "arg".to_string(),
                identifier: "tmp".to_string(),
                provenance: ProvenanceKind::FunctionLocal,
            }
        );
        assert!(f.slots().is_empty());
    }

    #[test]
    fn test_slot_lookup_by_target() {
        let mut f = decl();
        f.annotate("arg", "int", &Provenance::module_level())
            .unwrap();
        assert!(f.slot("arg").is_some());
        assert!(f.slot("other").is_none());
        assert_eq!(f.slot("arg").unwrap().owner(), &"f");
    }
}
