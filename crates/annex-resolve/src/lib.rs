// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Deferred annotation resolution for annex
//!
//! Declarations register annotation expressions as unevaluated text;
//! resolution happens later, on demand, against the owning module's scope.
//! This crate is the engine: the slot store, the resolver, bulk
//! resolution, the registration-time policy check, and the per-module
//! eager/deferred compatibility gate.
//!
//! # Pipeline
//!
//! ```text
//! Producer → annotate() — parse + policy check, store text
//!    ↓ (module initialization runs, names get bound)
//! Consumer → resolve_all() — free-name pre-pass → evaluate → mapping
//! ```
//!
//! # Example
//!
//! ```
//! use annex_resolve::{DeclKind, Declaration, Provenance, resolve_all};
//! use annex_runtime::{ClassObject, ModuleScope, Value};
//!
//! let mut f = Declaration::new("f", DeclKind::Function, "mymodule");
//! let provenance = Provenance::module_level();
//! f.annotate("arg", "Config", &provenance)?;
//! f.annotate("return", "None", &provenance)?;
//!
//! // `Config` is defined *after* `f` — a forward reference
//! let mut scope = ModuleScope::new("mymodule");
//! scope.bind("Config", Value::class(ClassObject::new("mymodule.Config")));
//!
//! let resolved = resolve_all(&f, &scope, None)?;
//! assert_eq!(resolved["return"], Value::None);
//! # Ok::<(), annex_resolve::ResolveError>(())
//! ```

pub mod error;
pub mod provenance;
pub mod registry;
pub mod resolver;
pub mod store;

pub use error::{ProvenanceKind, ResolveError};
pub use provenance::Provenance;
pub use registry::{AnnotationMode, ModuleRegistry};
pub use resolver::{resolve, resolve_all};
pub use store::{AnnotationSlot, CaptureMode, DeclKind, Declaration, SlotState};
