// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Hand-written recursive descent parser for annotation expressions.
//!
//! One annotation slot stores one standalone expression; this crate turns
//! that expression's text into an [`Expr`] tree. Parsing happens once, at
//! registration time — never during resolution.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead
//! - `error`: ParseError with error kinds
//! - `expr`: Expression parser using Pratt parsing
//!
//! ## Public API
//!
//! ```rust,ignore
//! pub fn parse_expression(tokens: &[(Token, Range<usize>)]) -> Result<Expr, ParseError>
//! pub fn parse_text(text: &str) -> Result<Expr, ParseError>
//! ```
//!
//! `parse_expression` consumes the whole token slice: an annotation is a
//! single expression, so trailing tokens are an error, not a recovery
//! point.

mod error;
mod stream;

pub use error::{ParseError, ParseErrorKind};
use stream::TokenStream;

mod expr;

use annex_ast::Expr;
use annex_lexer::Token;
use logos::Logos;
use std::ops::Range;

/// Parse a token sequence (with byte spans) into a single expression.
///
/// # Parameters
/// - `tokens`: Slice of (token, byte_span) pairs covering the whole text
///
/// # Returns
/// - `Ok(Expr)` if the tokens form exactly one expression
/// - `Err(ParseError)` on malformed input or trailing tokens
pub fn parse_expression(tokens: &[(Token, Range<usize>)]) -> Result<Expr, ParseError> {
    let mut stream = TokenStream::new(tokens);
    if stream.at_end() {
        return Err(ParseError::invalid_syntax(
            "empty annotation expression",
            annex_ast::Span::zero(),
        ));
    }

    let parsed = expr::parse_expr(&mut stream)?;

    if !stream.at_end() {
        return Err(ParseError::trailing_input(
            stream.peek().cloned(),
            stream.current_span(),
        ));
    }

    Ok(parsed)
}

/// Lex and parse annotation text into a single expression.
///
/// This is the entry the slot store uses to validate text at registration.
/// A character the lexer does not recognize is reported as invalid syntax
/// at its byte position.
pub fn parse_text(text: &str) -> Result<Expr, ParseError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(text).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(ParseError::invalid_syntax(
                    format!("unrecognized character {:?}", &text[span.clone()]),
                    annex_ast::Span::new(span.start as u32, span.end as u32),
                ));
            }
        }
    }
    parse_expression(&tokens)
}
