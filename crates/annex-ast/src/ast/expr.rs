//! Untyped expression AST for parser output
//!
//! This module defines the expression structures the annotation parser
//! produces. Annotation expressions are pure: no statements, no
//! assignments, no scope mutation. The resolver walks these trees twice —
//! once to collect free names for the pre-pass, once to evaluate.
//!
//! # Design Principles
//!
//! ## Parser Simplicity
//!
//! The parser produces simple, untyped structures:
//! - No resolution information (that's the resolver's job)
//! - No value semantics (that's the evaluator's job)
//! - Just syntactic structure + source locations
//!
//! # Resolution Flow
//!
//! ```text
//! Parser → Expr (untyped)
//!    ↓
//! Free-name pre-pass → first unresolved identifier, if any
//!    ↓
//! Evaluator → Value
//! ```

use crate::foundation::{BinaryOp, QualifiedPath, Span, UnaryOp};

/// Untyped expression from the annotation parser.
///
/// Represents one annotation expression as parsed from its stored text,
/// before name resolution. Every node carries the span of the text it was
/// parsed from so errors can quote the offending fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Expression kind (what kind of expression this is)
    pub kind: ExprKind,

    /// Location in the annotation text, for error messages
    pub span: Span,
}

impl Expr {
    /// Create a new expression.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create a name reference.
    pub fn name(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Name(name.into()), span)
    }

    /// Create a binary operator expression.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    /// Create a unary operator expression.
    pub fn unary(op: UnaryOp, operand: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// View this expression as a dotted path, if it is one.
    ///
    /// `Name` and chains of `Attribute` over a `Name` root are paths
    /// (`Outer.Inner.field`); anything else is not.
    pub fn as_path(&self) -> Option<QualifiedPath> {
        match &self.kind {
            ExprKind::Name(name) => Some(QualifiedPath::from(name.as_str())),
            ExprKind::Attribute { object, attr } => {
                object.as_path().map(|path| path.append(attr.as_str()))
            }
            _ => None,
        }
    }

    /// Collect free identifiers in source order, first occurrence only.
    ///
    /// Attribute names after a `.` are not free identifiers — only the
    /// rooting `Name` nodes are. This ordering is what determines which
    /// unresolved name an error reports: the first one encountered
    /// left-to-right.
    pub fn free_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_free_names(&mut names);
        names
    }

    fn collect_free_names<'e>(&'e self, names: &mut Vec<&'e str>) {
        match &self.kind {
            ExprKind::Name(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
            ExprKind::Attribute { object, .. } => object.collect_free_names(names),
            ExprKind::Subscript { object, index } => {
                object.collect_free_names(names);
                index.collect_free_names(names);
            }
            ExprKind::Call { func, args } => {
                func.collect_free_names(names);
                for arg in args {
                    arg.collect_free_names(names);
                }
            }
            ExprKind::Binary { left, right, .. } => {
                left.collect_free_names(names);
                right.collect_free_names(names);
            }
            ExprKind::Unary { operand, .. } => operand.collect_free_names(names),
            ExprKind::Tuple(items) | ExprKind::List(items) => {
                for item in items {
                    item.collect_free_names(names);
                }
            }
            ExprKind::IntLiteral(_)
            | ExprKind::FloatLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::BoolLiteral(_)
            | ExprKind::NoneLiteral => {}
        }
    }
}

/// Untyped expression kinds.
///
/// These are the syntactic forms annotation text may contain. Arbitrary
/// expressions are permitted — annotations are not required to describe
/// types — but only *expressions*: there is no statement form here.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // === Literals ===
    /// Integer literal
    IntLiteral(i64),

    /// Float literal
    FloatLiteral(f64),

    /// String literal (content, unescaped)
    StringLiteral(String),

    /// `True` / `False`
    BoolLiteral(bool),

    /// `None`
    NoneLiteral,

    // === References ===
    /// Free identifier, resolved against the effective bindings
    ///
    /// ```text
    /// Config
    /// ```
    Name(String),

    /// Attribute access
    ///
    /// ```text
    /// Outer.Inner
    /// module.Config
    /// ```
    Attribute {
        /// Receiver expression
        object: Box<Expr>,
        /// Attribute name (not a free identifier)
        attr: String,
    },

    /// Subscription
    ///
    /// ```text
    /// List[Config]
    /// Dict[(str, int)]
    /// ```
    Subscript {
        /// Receiver expression
        object: Box<Expr>,
        /// Index or parameter expression
        index: Box<Expr>,
    },

    /// Call
    ///
    /// ```text
    /// deprecated("use Config")
    /// ```
    Call {
        /// Callee expression
        func: Box<Expr>,
        /// Arguments in source order
        args: Vec<Expr>,
    },

    // === Displays ===
    /// Tuple display: `(a, b)` — also produced by `a, b` inside subscripts
    Tuple(Vec<Expr>),

    /// List display: `[a, b]`
    List(Vec<Expr>),

    // === Operators ===
    /// Binary operator
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },

    /// Unary operator
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
}
