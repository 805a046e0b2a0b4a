//! Atomic expressions - literals, names, parenthesized forms, list
//! displays.

use crate::{ParseError, TokenStream};
use annex_ast::{Expr, ExprKind};
use annex_lexer::Token;

/// Parse atomic expressions (literals, names, bracketed forms).
pub(super) fn parse_atom(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();

    match stream.peek() {
        Some(Token::None) => {
            stream.advance();
            Ok(Expr::new(ExprKind::NoneLiteral, stream.span_from(start)))
        }
        Some(Token::True) => {
            stream.advance();
            Ok(Expr::new(
                ExprKind::BoolLiteral(true),
                stream.span_from(start),
            ))
        }
        Some(Token::False) => {
            stream.advance();
            Ok(Expr::new(
                ExprKind::BoolLiteral(false),
                stream.span_from(start),
            ))
        }
        Some(Token::Integer(_)) | Some(Token::Float(_)) => parse_numeric_literal(stream),
        Some(Token::String(_)) => {
            let span = stream.current_span();
            match stream.advance() {
                Some(Token::String(s)) => Ok(Expr::new(
                    ExprKind::StringLiteral(s.to_string()),
                    stream.span_from(start),
                )),
                other => Err(ParseError::unexpected_token(other, "string literal", span)),
            }
        }
        Some(Token::Ident(_)) => parse_name(stream),
        Some(Token::LParen) => parse_parenthesized(stream),
        Some(Token::LBracket) => parse_list_display(stream),
        other => Err(ParseError::unexpected_token(
            other,
            "in expression",
            stream.current_span(),
        )),
    }
}

/// Parse numeric literal.
fn parse_numeric_literal(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let span = stream.current_span();

    let kind = match stream.advance() {
        Some(Token::Integer(n)) => ExprKind::IntLiteral(*n),
        Some(Token::Float(f)) => ExprKind::FloatLiteral(*f),
        other => {
            return Err(ParseError::unexpected_token(other, "numeric literal", span));
        }
    };

    Ok(Expr::new(kind, stream.span_from(start)))
}

/// Parse a name reference.
fn parse_name(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let span = stream.current_span();

    let name = match stream.advance() {
        Some(Token::Ident(s)) => s.to_string(),
        other => {
            return Err(ParseError::unexpected_token(other, "identifier", span));
        }
    };

    Ok(Expr::new(ExprKind::Name(name), stream.span_from(start)))
}

/// Parse a parenthesized expression or tuple display.
///
/// `(x)` is grouping; `()`, `(x,)` and `(a, b)` are tuples.
fn parse_parenthesized(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::LParen)?;

    if matches!(stream.peek(), Some(Token::RParen)) {
        stream.advance();
        return Ok(Expr::new(
            ExprKind::Tuple(Vec::new()),
            stream.span_from(start),
        ));
    }

    let first = super::parse_expr(stream)?;

    if matches!(stream.peek(), Some(Token::Comma)) {
        let mut items = vec![first];
        while matches!(stream.peek(), Some(Token::Comma)) {
            stream.advance();
            if matches!(stream.peek(), Some(Token::RParen)) {
                break;
            }
            items.push(super::parse_expr(stream)?);
        }
        stream.expect(Token::RParen)?;
        return Ok(Expr::new(ExprKind::Tuple(items), stream.span_from(start)));
    }

    stream.expect(Token::RParen)?;
    Ok(first)
}

/// Parse a list display: `[expr, expr, ...]`.
fn parse_list_display(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::LBracket)?;

    let mut elements = Vec::new();
    while !matches!(stream.peek(), Some(Token::RBracket)) {
        elements.push(super::parse_expr(stream)?);

        if !matches!(stream.peek(), Some(Token::RBracket)) {
            stream.expect(Token::Comma)?;
        }
    }

    stream.expect(Token::RBracket)?;

    Ok(Expr::new(
        ExprKind::List(elements),
        stream.span_from(start),
    ))
}
