//! Verbatim annotation expression text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable textual form of one annotation expression.
///
/// The text is captured at declaration time and never re-derived: when the
/// producer supplied the annotation as a string literal, that literal's
/// content is preserved byte-for-byte. Text derived from a parsed expression
/// form need not byte-match the original source formatting, but once
/// constructed it is frozen.
///
/// The text is guaranteed by the producer to parse as a standalone
/// expression; the slot store re-validates this at registration and refuses
/// the declaration otherwise.
///
/// # Examples
///
/// ```
/// # use annex_ast::ExpressionText;
/// let text = ExpressionText::new("List[Config] | None");
/// assert_eq!(text.as_str(), "List[Config] | None");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpressionText(String);

impl ExpressionText {
    /// Capture expression text verbatim.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The verbatim text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the text is empty.
    ///
    /// An empty text never parses as a standalone expression; the store
    /// rejects it at registration.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExpressionText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExpressionText {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ExpressionText {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ExpressionText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbatim_round_trip() {
        // Whitespace and formatting inside the literal are preserved exactly.
        let raw = "Dict[ str,int ]  |None";
        let text = ExpressionText::new(raw);
        assert_eq!(text.as_str(), raw);
        assert_eq!(text.to_string(), raw);
    }

    #[test]
    fn test_empty() {
        assert!(ExpressionText::new("").is_empty());
        assert!(!ExpressionText::new("x").is_empty());
    }
}
