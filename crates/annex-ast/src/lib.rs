// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST types for annex annotation expressions
//!
//! This crate contains the expression AST produced by the parser, the
//! verbatim [`ExpressionText`] representation stored in annotation slots,
//! and foundation types (spans, qualified paths) used by the parser and
//! resolver.

pub mod ast;
pub mod foundation;
pub mod text;

// Re-export commonly used types
pub use foundation::{BinaryOp, QualifiedPath, Span, UnaryOp};
pub use text::ExpressionText;

pub use ast::*;
