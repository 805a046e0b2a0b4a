//! The guard flag.
//!
//! A process-wide constant, always `false` at runtime, used to gate
//! statements (typically imports) that exist only to make an annotation's
//! forward reference resolvable for static tooling. Guarded statements are
//! parsed but never executed, so names they would bind never reach the
//! module scope — resolving an annotation that references such a name
//! raises a name-resolution error even though registration succeeded.
//!
//! Static analysis tooling treats the flag's name as true when deciding
//! which branches to analyze. The permanent divergence between what static
//! tools see and what runs is intentional.
//!
//! Reassignment fails: the flag is a Rust `const`, so there is nothing to
//! assign to at runtime.

use crate::value::Value;

/// The guard flag. Always `false`; there is no runtime toggle.
pub const STATIC_ONLY: bool = false;

/// Conventional spelling of the flag as a module-scope name.
pub const BINDING_NAME: &str = "STATIC_ONLY";

/// The (name, value) pair a host prelude binds so that guarded code can
/// reference the flag by name. The value is an ordinary `False`; the core
/// never reads it back.
pub fn binding() -> (String, Value) {
    (BINDING_NAME.to_string(), Value::Bool(STATIC_ONLY))
}
