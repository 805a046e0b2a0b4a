// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Evaluation runtime for annex annotation expressions
//!
//! This crate owns everything an annotation expression touches when it is
//! finally resolved: the [`Value`] domain, per-module name scopes
//! ([`ModuleScope`]), the effective-binding overlay ([`Bindings`]), the
//! guard flag, and the evaluator itself.
//!
//! The evaluator is pure expression evaluation: no statement execution and
//! no scope mutation as a side effect of resolution. The only observable
//! side effects an expression can have go through host-supplied
//! [`Native`](value::Native) callables.

pub mod error;
pub mod eval;
pub mod guard;
pub mod scope;
pub mod value;

pub use error::EvalError;
pub use eval::eval;
pub use scope::{Bindings, ExtraBindings, ModuleId, ModuleScope};
pub use value::{ClassObject, Native, NativeFn, Value};
