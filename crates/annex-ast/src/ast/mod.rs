//! Expression AST produced by the annotation parser.

pub mod expr;

pub use expr::{Expr, ExprKind};
