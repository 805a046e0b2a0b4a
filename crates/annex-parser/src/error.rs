//! Parse error types.

use annex_ast::Span;
use annex_lexer::Token;
use std::fmt;

/// Parse error with source location and context.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Kind of parse error
    pub kind: ParseErrorKind,
    /// Location in the annotation text where the error occurred
    pub span: Span,
    /// Human-readable error message
    pub message: String,
}

/// Category of parse error.
///
/// Each variant represents a specific class of parsing failure to enable
/// clear diagnostic messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Unexpected token encountered where a specific token was expected.
    ///
    /// Example: Expected `]` to close a subscript, found `,` instead.
    UnexpectedToken,

    /// Unexpected end of input while parsing was incomplete.
    ///
    /// Example: Reached end of text inside `List[`, missing `]`.
    UnexpectedEof,

    /// Tokens are present but violate the expression grammar, or a
    /// character failed to lex at all.
    ///
    /// Example: `| Config` (operator with no left operand).
    InvalidSyntax,

    /// The text parsed as an expression but did not end there.
    ///
    /// An annotation stores exactly one standalone expression; anything
    /// after it means the text was not an expression to begin with.
    ///
    /// Example: `Config Config`.
    TrailingInput,
}

impl ParseError {
    /// Create an "expected token" error.
    pub fn expected_token(expected: Token, found: Option<Token>, span: Span) -> Self {
        let message = match &found {
            Some(token) => format!("expected '{}', found '{}'", expected, token),
            None => format!("expected '{}', found end of input", expected),
        };
        Self {
            kind: if found.is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::UnexpectedToken
            },
            span,
            message,
        }
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(found: Option<&Token>, context: &str, span: Span) -> Self {
        let message = match found {
            Some(token) => format!("unexpected '{}' {}", token, context),
            None => format!("unexpected end of input {}", context),
        };
        Self {
            kind: if found.is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::UnexpectedToken
            },
            span,
            message,
        }
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidSyntax,
            span,
            message: message.into(),
        }
    }

    /// Create a "trailing input" error.
    pub fn trailing_input(found: Option<Token>, span: Span) -> Self {
        let message = match &found {
            Some(token) => format!("trailing '{}' after expression", token),
            None => "trailing input after expression".to_string(),
        };
        Self {
            kind: ParseErrorKind::TrailingInput,
            span,
            message,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at bytes {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}
