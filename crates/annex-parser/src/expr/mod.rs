//! Expression parser using Pratt parsing (precedence climbing).
//!
//! ## Precedence Levels (lowest to highest)
//!
//! 1. `or` - left associative
//! 2. `and` - left associative
//! 3. `not` - prefix
//! 4. `==`, `!=`, `<`, `<=`, `>`, `>=` (Comparison) - left associative
//! 5. `|` (Union) - left associative
//! 6. `+`, `-` (Addition) - left associative
//! 7. `*`, `/`, `%` (Multiplication) - left associative
//! 8. Unary `-` - prefix
//! 9. `**` (Power) - right associative
//! 10. Postfix: `.attr`, `[index]`, `(args)` - left associative
//!
//! ## Module Organization
//!
//! - `pratt` - Pratt parser core (precedence climbing, binary/unary ops,
//!   postfix chains)
//! - `atoms` - Atomic expressions (literals, names, parenthesized forms,
//!   list displays)

mod atoms;
mod pratt;

use super::{ParseError, TokenStream};
use annex_ast::Expr;

/// Parse an expression.
pub fn parse_expr(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    pratt::parse_pratt(stream, 0)
}
