//! The resolution error taxonomy
//!
//! Downstream tooling matches on these variants, so the classification is
//! part of the contract:
//!
//! | Variant | Raised when |
//! |---|---|
//! | `Syntax` | registration text does not parse as a standalone expression |
//! | `NameResolution` | a free identifier is absent from the effective bindings |
//! | `Evaluation` | the expression is referentially valid but faults during evaluation |
//! | `Policy` | a free identifier is only reachable via an enclosing local scope |
//!
//! `Syntax` and `Policy` are fatal at declaration time: the declaration
//! aborts and nothing is stored. `NameResolution` and `Evaluation` surface
//! synchronously from `resolve`/`resolve_all`.

use annex_ast::ExpressionText;
use annex_parser::ParseError;
use annex_runtime::EvalError;
use std::fmt;
use thiserror::Error;

/// Resolution result type
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Classified resolution failure.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    /// Registration received text that does not parse as a standalone
    /// expression. Declaration construction aborts.
    #[error("annotation '{target}' on '{declaration}' is not an expression: {source} (text: {text})")]
    Syntax {
        /// The declaration being constructed
        declaration: String,
        /// The slot target the text was meant for
        target: String,
        /// The offending text, verbatim
        text: ExpressionText,
        /// The underlying parse failure
        #[source]
        source: ParseError,
    },

    /// A free identifier in the expression is absent from the effective
    /// bindings. Names the *first* unresolved identifier in source order.
    #[error("name '{identifier}' is not defined (annotation '{target}')")]
    NameResolution {
        /// The slot target being resolved
        target: String,
        /// The first unresolved identifier
        identifier: String,
    },

    /// The expression is referentially valid but evaluation faulted.
    #[error("annotation '{target}' failed to evaluate: {source}")]
    Evaluation {
        /// The slot target being resolved
        target: String,
        /// The wrapped evaluation fault
        #[source]
        source: EvalError,
    },

    /// The expression references a name that lives in an enclosing local
    /// scope. Categorically disallowed, whether or not a same-spelled
    /// module name would let it resolve. Detected at registration.
    #[error(
        "annotation '{target}' references '{identifier}', which is local to an enclosing {provenance}"
    )]
    Policy {
        /// The slot target being registered
        target: String,
        /// The disallowed identifier
        identifier: String,
        /// Which kind of enclosing scope owns the name
        provenance: ProvenanceKind,
    },
}

/// Which enclosing scope a disallowed name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvenanceKind {
    /// Local to an enclosing function; unavailable after definition time.
    FunctionLocal,
    /// Bound in an enclosing class body; reachable only through the class,
    /// so the supported spelling is the qualified path.
    ClassLocal,
}

impl fmt::Display for ProvenanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvenanceKind::FunctionLocal => write!(f, "function scope"),
            ProvenanceKind::ClassLocal => write!(f, "class body"),
        }
    }
}
