//! Qualified path representation for nested declarations
//!
//! Qualified paths are dot-separated name sequences from a module root down
//! to a nested declaration:
//! - `Outer.Inner.field`
//! - `Config.Defaults`
//!
//! The resolver uses them to express which dotted spellings are permitted in
//! annotation text. The core never synthesizes nested scopes from a path;
//! a dotted reference resolves through ordinary attribute access starting at
//! the path's module-level root.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A hierarchical dotted name for nested declarations.
///
/// Paths are immutable and support efficient comparison and hashing.
/// They are used as declaration identities and in error messages.
///
/// # Examples
///
/// ```
/// # use annex_ast::foundation::QualifiedPath;
/// let path = QualifiedPath::from("Outer.Inner.field");
/// assert_eq!(path.segments(), &["Outer", "Inner", "field"]);
/// assert_eq!(path.root(), Some("Outer"));
/// assert_eq!(path.to_string(), "Outer.Inner.field");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedPath {
    segments: Vec<String>,
}

impl QualifiedPath {
    /// Create a new path from a vector of segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Parse a path from a dot-separated string.
    pub fn parse(s: &str) -> Self {
        Self {
            segments: s.split('.').map(String::from).collect(),
        }
    }

    /// Get the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the first segment: the module-level root name.
    ///
    /// This is the only segment that must be visible in the module scope;
    /// the rest resolve through attribute access.
    pub fn root(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Get the last segment (leaf name).
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Append a segment to create a new path.
    pub fn append(&self, segment: impl Into<String>) -> Self {
        let mut new_segments = self.segments.clone();
        new_segments.push(segment.into());
        Self::new(new_segments)
    }

    /// Get the parent path (all segments except the last).
    ///
    /// Returns None if this is a single-segment path.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            None
        } else {
            Some(Self::new(self.segments[..self.segments.len() - 1].to_vec()))
        }
    }

    /// Check if this path starts with another path.
    pub fn starts_with(&self, prefix: &QualifiedPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for QualifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for QualifiedPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for QualifiedPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl PartialEq<&str> for QualifiedPath {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_creation() {
        let path = QualifiedPath::from("a.b.c");
        assert_eq!(path.segments(), &["a", "b", "c"]);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_path_display() {
        let path = QualifiedPath::from("Outer.Inner");
        assert_eq!(path.to_string(), "Outer.Inner");
    }

    #[test]
    fn test_path_root_leaf() {
        let path = QualifiedPath::from("Outer.Inner.field");
        assert_eq!(path.root(), Some("Outer"));
        assert_eq!(path.leaf(), Some("field"));
    }

    #[test]
    fn test_path_parent() {
        let path = QualifiedPath::from("a.b.c");
        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "a.b");

        let single = QualifiedPath::from("a");
        assert!(single.parent().is_none());
    }

    #[test]
    fn test_path_append() {
        let path = QualifiedPath::from("Outer");
        let extended = path.append("Inner");
        assert_eq!(extended.to_string(), "Outer.Inner");
    }

    #[test]
    fn test_path_starts_with() {
        let path = QualifiedPath::from("a.b.c.d");
        let prefix = QualifiedPath::from("a.b");
        assert!(path.starts_with(&prefix));

        let non_prefix = QualifiedPath::from("a.x");
        assert!(!path.starts_with(&non_prefix));
    }
}
