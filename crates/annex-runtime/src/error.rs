//! Evaluation faults
//!
//! These are the failures an annotation expression can hit once its names
//! all resolve: the expression is referentially valid but evaluation
//! itself faults. The resolver wraps them into its own error taxonomy.

use thiserror::Error;

/// Evaluation result type
pub type Result<T> = std::result::Result<T, EvalError>;

/// Evaluation faults
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    #[error("name not defined: {name}")]
    NameNotFound { name: String },

    #[error("no attribute '{attr}' on {on}")]
    AttributeNotFound { on: String, attr: String },

    #[error("{on} is not subscriptable")]
    NotSubscriptable { on: String },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("{on} is not callable")]
    NotCallable { on: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in '{op}'")]
    NumericOverflow { op: String },

    #[error("unsupported operand types for '{op}': {left} and {right}")]
    TypeMismatch {
        op: String,
        left: String,
        right: String,
    },

    #[error("unsupported operand type for 'unary {op}': {operand}")]
    UnaryTypeMismatch { op: String, operand: String },

    #[error("{message}")]
    Native { message: String },
}

impl EvalError {
    /// Fault raised from inside a host-supplied native callable.
    pub fn native(message: impl Into<String>) -> Self {
        Self::Native {
            message: message.into(),
        }
    }
}
