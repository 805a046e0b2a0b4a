//! Token stream wrapper for the hand-written parser.

use annex_ast::Span;
use annex_lexer::Token;
use std::ops::Range;

/// Token stream with lookahead and position tracking.
///
/// Provides methods for consuming tokens, lookahead, and span tracking for
/// the recursive descent parser.
///
/// Each token is paired with its byte span in the annotation text, so
/// errors can point at the exact offending fragment.
pub struct TokenStream<'src> {
    tokens: &'src [(Token, Range<usize>)],
    pos: usize,
}

impl<'src> TokenStream<'src> {
    /// Create a new token stream from tokens with their byte spans.
    pub fn new(tokens: &'src [(Token, Range<usize>)]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    /// Advance to the next token and return the current one.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos).map(|(tok, _)| tok);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token matches the expected token.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Expect a specific token and advance if it matches.
    ///
    /// Returns an error if the token doesn't match.
    pub fn expect(&mut self, expected: Token) -> Result<Span, super::ParseError> {
        if self.check(&expected) {
            let start = self.pos;
            self.advance();
            Ok(self.span_from(start))
        } else {
            Err(super::ParseError::expected_token(
                expected,
                self.peek().cloned(),
                self.current_span(),
            ))
        }
    }

    /// Check if we've reached the end of the token stream.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Get the current position in the token stream.
    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// Create a span from a starting position to the last consumed token.
    ///
    /// Uses actual byte offsets from the annotation text.
    ///
    /// # Panics
    ///
    /// Panics if `start` position is out of bounds for the token stream.
    pub fn span_from(&self, start: usize) -> Span {
        assert!(
            start < self.tokens.len(),
            "span_from: start position {} out of bounds (stream length: {})",
            start,
            self.tokens.len()
        );

        let start_byte = self.tokens[start].1.start;

        let end_byte = if self.pos > 0 && self.pos <= self.tokens.len() {
            // End of the last consumed token
            self.tokens[self.pos - 1].1.end
        } else {
            start_byte
        };

        Span::new(start_byte as u32, end_byte as u32)
    }

    /// Get a span for the current token.
    ///
    /// At EOF this is a zero-length span just past the last token.
    pub fn current_span(&self) -> Span {
        if let Some((_, span)) = self.tokens.get(self.pos) {
            Span::new(span.start as u32, span.end as u32)
        } else if let Some((_, span)) = self.tokens.last() {
            Span::new(span.end as u32, span.end as u32)
        } else {
            Span::zero()
        }
    }
}
