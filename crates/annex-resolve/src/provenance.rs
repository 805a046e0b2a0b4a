//! Name provenance supplied by the producer.
//!
//! The front-end knows, at declaration time, which names around a
//! declaration live in an enclosing function scope or class body. It hands
//! those sets to registration so the policy check can reject a reference
//! that would otherwise silently resolve against an unrelated module-level
//! name of the same spelling — the wrong value, not a loud error.

use crate::error::ProvenanceKind;
use std::collections::HashSet;

/// The enclosing-scope names visible around a declaration site.
///
/// Empty sets (the default) describe a module-level declaration: nothing
/// is disallowed.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    function_locals: HashSet<String>,
    class_locals: HashSet<String>,
}

impl Provenance {
    /// Provenance of a module-level declaration: no enclosing scopes.
    pub fn module_level() -> Self {
        Self::default()
    }

    /// Add names local to an enclosing function.
    pub fn with_function_locals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.function_locals.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add names bound in an enclosing class body.
    pub fn with_class_locals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_locals.extend(names.into_iter().map(Into::into));
        self
    }

    /// Classify a free identifier, if it is disallowed.
    ///
    /// Function locals shadow class locals when a name appears in both,
    /// matching how the inner scope would win at the declaration site.
    pub fn classify(&self, name: &str) -> Option<ProvenanceKind> {
        if self.function_locals.contains(name) {
            Some(ProvenanceKind::FunctionLocal)
        } else if self.class_locals.contains(name) {
            Some(ProvenanceKind::ClassLocal)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_level_allows_everything() {
        let provenance = Provenance::module_level();
        assert_eq!(provenance.classify("anything"), None);
    }

    #[test]
    fn test_classify() {
        let provenance = Provenance::module_level()
            .with_function_locals(["tmp"])
            .with_class_locals(["sibling"]);

        assert_eq!(
            provenance.classify("tmp"),
            Some(ProvenanceKind::FunctionLocal)
        );
        assert_eq!(
            provenance.classify("sibling"),
            Some(ProvenanceKind::ClassLocal)
        );
        assert_eq!(provenance.classify("Config"), None);
    }

    #[test]
    fn test_function_locals_shadow_class_locals() {
        let provenance = Provenance::module_level()
            .with_function_locals(["name"])
            .with_class_locals(["name"]);
        assert_eq!(
            provenance.classify("name"),
            Some(ProvenanceKind::FunctionLocal)
        );
    }
}
