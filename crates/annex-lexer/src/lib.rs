// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Lexical analysis for annotation expression text.
//!
//! This crate tokenizes one annotation expression at a time using logos.
//! The input is always a single standalone expression — there are no
//! statements, no newline sensitivity, no indentation.
//!
//! # Design
//!
//! - `Token` — all token types an annotation expression may contain
//! - Whitespace and `#` comments are stripped during lexing (not tokens)
//! - Literal keywords (`None`, `True`, `False`) and word operators
//!   (`and`, `or`, `not`) are distinct tokens, never identifiers
//!
//! # Examples
//!
//! ```
//! # use annex_lexer::Token;
//! # use logos::Logos;
//! let text = "List[Config] | None";
//! let tokens: Vec<Result<Token, ()>> = Token::lexer(text).collect();
//! ```

use logos::Logos;
use std::rc::Rc;

/// Annotation expression token.
///
/// Represents all lexical elements annotation text may contain: literal
/// keywords, word operators, symbolic operators, delimiters, literals, and
/// identifiers.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")] // Skip whitespace
#[logos(skip r"#[^\n]*")] // Skip # comments
pub enum Token {
    // === Literal keywords ===
    /// Literal `None`
    #[token("None")]
    None,
    /// Literal `True`
    #[token("True")]
    True,
    /// Literal `False`
    #[token("False")]
    False,

    // === Word operators ===
    /// Operator `and` (short-circuit)
    #[token("and")]
    And,
    /// Operator `or` (short-circuit)
    #[token("or")]
    Or,
    /// Operator `not`
    #[token("not")]
    Not,

    // === Arithmetic ===
    /// Operator `+`
    #[token("+")]
    Plus,
    /// Operator `-`
    #[token("-")]
    Minus,
    /// Operator `*`
    #[token("*")]
    Star,
    /// Operator `**` (power, binds tighter than `*`)
    #[token("**")]
    StarStar,
    /// Operator `/`
    #[token("/")]
    Slash,
    /// Operator `%`
    #[token("%")]
    Percent,

    // === Comparison ===
    /// Operator `==`
    #[token("==")]
    EqEq,
    /// Operator `!=`
    #[token("!=")]
    BangEq,
    /// Operator `<`
    #[token("<")]
    Lt,
    /// Operator `<=`
    #[token("<=")]
    LtEq,
    /// Operator `>`
    #[token(">")]
    Gt,
    /// Operator `>=`
    #[token(">=")]
    GtEq,

    // === Other operators ===
    /// Operator `|` (union of class-like values)
    #[token("|")]
    Pipe,
    /// Operator `.`
    #[token(".")]
    Dot,
    /// Delimiter `,`
    #[token(",")]
    Comma,
    /// Delimiter `:`
    #[token(":")]
    Colon,

    // === Delimiters ===
    /// Delimiter `(`
    #[token("(")]
    LParen,
    /// Delimiter `)`
    #[token(")")]
    RParen,
    /// Delimiter `[`
    #[token("[")]
    LBracket,
    /// Delimiter `]`
    #[token("]")]
    RBracket,

    // === Literals ===
    /// Integer literal (e.g., 42, 0, 1000)
    ///
    /// Overflowing literals fail the `parse` callback and surface as a
    /// generic lexer error at that position.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    /// Float literal (e.g., 3.14, 1.0, 5.67e-8)
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    /// String literal, double or single quoted.
    ///
    /// Uses `Rc<str>` for cheap cloning through the parser.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        let content = &s[1..s.len()-1];
        unescape_string(content).map(|s| Rc::from(s.as_str()))
    })]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| {
        let s = lex.slice();
        let content = &s[1..s.len()-1];
        unescape_string(content).map(|s| Rc::from(s.as_str()))
    })]
    String(Rc<str>),

    /// Identifier (e.g., Config, x, _private, List)
    ///
    /// Uses `Rc<str>` for cheap cloning through the parser.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| Rc::from(lex.slice()))]
    Ident(Rc<str>),
}

/// Unescape a string literal content.
fn unescape_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some(_u) => {
                    // Unsupported escape sequence
                    return None;
                }
                None => return None, // Trailing backslash
            }
        } else {
            result.push(c);
        }
    }
    Some(result)
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::None => write!(f, "None"),
            Token::True => write!(f, "True"),
            Token::False => write!(f, "False"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Not => write!(f, "not"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::StarStar => write!(f, "**"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::EqEq => write!(f, "=="),
            Token::BangEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::LtEq => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::GtEq => write!(f, ">="),
            Token::Pipe => write!(f, "|"),
            Token::Dot => write!(f, "."),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Integer(n) => write!(f, "{}", n),
            Token::Float(x) => write!(f, "{}", x),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Ident(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::approx_constant)] // Tests verify lexing of literal 3.14, not mathematical PI
mod tests {
    use super::*;

    /// Test helper: lex text and filter out errors.
    ///
    /// This is lenient for testing valid token sequences. For tests that
    /// need to verify error handling, use `Token::lexer()` directly and
    /// check the `Result` stream.
    fn lex(text: &str) -> Vec<Token> {
        Token::lexer(text).filter_map(|result| result.ok()).collect()
    }

    /// Test helper: create an identifier token.
    fn ident(s: &str) -> Token {
        Token::Ident(Rc::from(s))
    }

    /// Test helper: create a string literal token.
    fn string(s: &str) -> Token {
        Token::String(Rc::from(s))
    }

    #[test]
    fn test_literal_keywords() {
        let tokens = lex("None True False");
        assert_eq!(tokens, vec![Token::None, Token::True, Token::False]);
    }

    #[test]
    fn test_identifiers() {
        let tokens = lex("Config _private snake_case X");
        assert_eq!(
            tokens,
            vec![
                ident("Config"),
                ident("_private"),
                ident("snake_case"),
                ident("X"),
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_identifiers() {
        // Identifiers that merely start with a keyword stay identifiers
        let tokens = lex("Nonexistent android nothing orchid");
        assert_eq!(
            tokens,
            vec![
                ident("Nonexistent"),
                ident("android"),
                ident("nothing"),
                ident("orchid"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("42 3.14 5.67e-8 1e10");
        assert_eq!(
            tokens,
            vec![
                Token::Integer(42),
                Token::Float(3.14),
                Token::Float(5.67e-8),
                Token::Float(1e10),
            ]
        );
    }

    #[test]
    fn test_strings() {
        let tokens = lex(r#""hello" 'world'"#);
        assert_eq!(tokens, vec![string("hello"), string("world")]);
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#""line\nbreak" '\''"#);
        assert_eq!(tokens, vec![string("line\nbreak"), string("'")]);
    }

    #[test]
    fn test_operators() {
        let tokens = lex("+ - * ** / % == != < <= > >=");
        assert_eq!(
            tokens,
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::StarStar,
                Token::Slash,
                Token::Percent,
                Token::EqEq,
                Token::BangEq,
                Token::Lt,
                Token::LtEq,
                Token::Gt,
                Token::GtEq,
            ]
        );
    }

    #[test]
    fn test_power_binds_as_one_token() {
        let tokens = lex("2**8");
        assert_eq!(
            tokens,
            vec![Token::Integer(2), Token::StarStar, Token::Integer(8)]
        );
    }

    #[test]
    fn test_delimiters() {
        let tokens = lex("( ) [ ] , : . |");
        assert_eq!(
            tokens,
            vec![
                Token::LParen,
                Token::RParen,
                Token::LBracket,
                Token::RBracket,
                Token::Comma,
                Token::Colon,
                Token::Dot,
                Token::Pipe,
            ]
        );
    }

    #[test]
    fn test_dotted_path() {
        let tokens = lex("Outer.Inner.field");
        assert_eq!(
            tokens,
            vec![
                ident("Outer"),
                Token::Dot,
                ident("Inner"),
                Token::Dot,
                ident("field"),
            ]
        );
    }

    #[test]
    fn test_subscript_and_union() {
        let tokens = lex("List[Config] | None");
        assert_eq!(
            tokens,
            vec![
                ident("List"),
                Token::LBracket,
                ident("Config"),
                Token::RBracket,
                Token::Pipe,
                Token::None,
            ]
        );
    }

    #[test]
    fn test_word_operators() {
        let tokens = lex("a and b or not c");
        assert_eq!(
            tokens,
            vec![
                ident("a"),
                Token::And,
                ident("b"),
                Token::Or,
                Token::Not,
                ident("c"),
            ]
        );
    }

    #[test]
    fn test_hash_comments() {
        let tokens = lex("Config # trailing note");
        assert_eq!(tokens, vec![ident("Config")]);
    }

    #[test]
    fn test_whitespace_handling() {
        let tokens = lex("  Config\t|\nNone\r\n");
        assert_eq!(tokens, vec![ident("Config"), Token::Pipe, Token::None]);
    }

    #[test]
    fn test_lexer_error_detection() {
        // `@` is not part of the expression grammar
        let results: Vec<_> = Token::lexer("Config @ None").collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok()); // Config
        assert!(results[1].is_err()); // @
        assert!(results[2].is_ok()); // None
    }

    #[test]
    fn test_division_text() {
        // "1/0" is lexically fine; it fails later, at evaluation
        let tokens = lex("1/0");
        assert_eq!(
            tokens,
            vec![Token::Integer(1), Token::Slash, Token::Integer(0)]
        );
    }
}
