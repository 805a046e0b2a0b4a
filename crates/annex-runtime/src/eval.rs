//! Expression evaluator.
//!
//! Evaluates a parsed annotation expression against an effective binding
//! set. Pure expression evaluation: name lookup goes through the supplied
//! [`Bindings`] only — no enclosing function scope exists here, and
//! nothing the evaluator does mutates a scope.

use crate::error::{EvalError, Result};
use crate::scope::Bindings;
use crate::value::Value;
use annex_ast::{BinaryOp, Expr, ExprKind, UnaryOp};

/// Evaluate one expression against the effective bindings.
pub fn eval(expr: &Expr, bindings: &Bindings) -> Result<Value> {
    match &expr.kind {
        ExprKind::NoneLiteral => Ok(Value::None),
        ExprKind::BoolLiteral(b) => Ok(Value::Bool(*b)),
        ExprKind::IntLiteral(n) => Ok(Value::Int(*n)),
        ExprKind::FloatLiteral(x) => Ok(Value::Float(*x)),
        ExprKind::StringLiteral(s) => Ok(Value::Str(s.clone())),

        ExprKind::Name(name) => bindings
            .lookup(name)
            .cloned()
            .ok_or_else(|| EvalError::NameNotFound { name: name.clone() }),

        ExprKind::Attribute { object, attr } => {
            let receiver = eval(object, bindings)?;
            eval_attribute(&receiver, attr)
        }

        ExprKind::Subscript { object, index } => {
            let receiver = eval(object, bindings)?;
            let index = eval(index, bindings)?;
            eval_subscript(receiver, index)
        }

        ExprKind::Call { func, args } => {
            let callee = eval(func, bindings)?;
            let mut arg_values = Vec::with_capacity(args.len());
            for arg in args {
                arg_values.push(eval(arg, bindings)?);
            }
            match callee {
                Value::Native(native) => native.call(&arg_values),
                other => Err(EvalError::NotCallable {
                    on: other.type_name().to_string(),
                }),
            }
        }

        ExprKind::Tuple(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval(item, bindings)?);
            }
            Ok(Value::Tuple(values))
        }

        ExprKind::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval(item, bindings)?);
            }
            Ok(Value::List(values))
        }

        ExprKind::Binary { op, left, right } => match op {
            // Short-circuit forms return the deciding operand itself
            BinaryOp::And => {
                let lhs = eval(left, bindings)?;
                if lhs.is_truthy() {
                    eval(right, bindings)
                } else {
                    Ok(lhs)
                }
            }
            BinaryOp::Or => {
                let lhs = eval(left, bindings)?;
                if lhs.is_truthy() {
                    Ok(lhs)
                } else {
                    eval(right, bindings)
                }
            }
            _ => {
                let lhs = eval(left, bindings)?;
                let rhs = eval(right, bindings)?;
                eval_binary(*op, lhs, rhs)
            }
        },

        ExprKind::Unary { op, operand } => {
            let value = eval(operand, bindings)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                UnaryOp::Neg => match value {
                    Value::Int(n) => n
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or_else(|| EvalError::NumericOverflow {
                            op: "-".to_string(),
                        }),
                    Value::Float(x) => Ok(Value::Float(-x)),
                    other => Err(EvalError::UnaryTypeMismatch {
                        op: "-".to_string(),
                        operand: other.type_name().to_string(),
                    }),
                },
            }
        }
    }
}

/// Attribute access: class attribute tables only.
fn eval_attribute(receiver: &Value, attr: &str) -> Result<Value> {
    match receiver {
        Value::Class(object) => {
            object
                .attrs
                .get(attr)
                .cloned()
                .ok_or_else(|| EvalError::AttributeNotFound {
                    on: format!("class {}", object.path),
                    attr: attr.to_string(),
                })
        }
        other => Err(EvalError::AttributeNotFound {
            on: other.type_name().to_string(),
            attr: attr.to_string(),
        }),
    }
}

/// Subscription: class parameterization and sequence indexing.
fn eval_subscript(receiver: Value, index: Value) -> Result<Value> {
    match receiver {
        // Class-like receivers parameterize: List[int], Dict[str, int],
        // Optional[x][y] and friends
        base @ (Value::Class(_) | Value::Generic { .. }) => {
            let args = match index {
                Value::Tuple(items) => items,
                single => vec![single],
            };
            Ok(Value::Generic {
                base: Box::new(base),
                args,
            })
        }

        Value::List(items) | Value::Tuple(items) => match index {
            Value::Int(i) => {
                let len = items.len();
                let effective = if i < 0 { i + len as i64 } else { i };
                if effective < 0 || effective as usize >= len {
                    return Err(EvalError::IndexOutOfRange { index: i, len });
                }
                Ok(items[effective as usize].clone())
            }
            other => Err(EvalError::TypeMismatch {
                op: "[]".to_string(),
                left: "sequence".to_string(),
                right: other.type_name().to_string(),
            }),
        },

        other => Err(EvalError::NotSubscriptable {
            on: other.type_name().to_string(),
        }),
    }
}

/// Non-short-circuit binary operators.
fn eval_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
    match op {
        BinaryOp::BitOr => eval_bitor(lhs, rhs),
        BinaryOp::Add => eval_add(lhs, rhs),
        BinaryOp::Sub => numeric_op(op, lhs, rhs, |a, b| a.checked_sub(b), |a, b| a - b),
        BinaryOp::Mul => numeric_op(op, lhs, rhs, |a, b| a.checked_mul(b), |a, b| a * b),
        BinaryOp::Div => eval_div(lhs, rhs),
        BinaryOp::Mod => eval_mod(lhs, rhs),
        BinaryOp::Pow => eval_pow(lhs, rhs),
        BinaryOp::Eq => Ok(Value::Bool(value_eq(&lhs, &rhs))),
        BinaryOp::Ne => Ok(Value::Bool(!value_eq(&lhs, &rhs))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => eval_ordering(op, lhs, rhs),
        BinaryOp::And | BinaryOp::Or => {
            unreachable!("short-circuit operators are handled in eval()")
        }
    }
}

/// `|`: bitwise or on integers, union construction on class-like values.
fn eval_bitor(lhs: Value, rhs: Value) -> Result<Value> {
    if let (Value::Int(a), Value::Int(b)) = (&lhs, &rhs) {
        return Ok(Value::Int(a | b));
    }
    if lhs.is_class_like() && rhs.is_class_like() {
        let mut members = Vec::new();
        push_union_member(&mut members, lhs);
        push_union_member(&mut members, rhs);
        if members.len() == 1 {
            // X | X collapses to X
            return Ok(members.into_iter().next().expect("one member"));
        }
        return Ok(Value::Union(members));
    }
    Err(type_mismatch(BinaryOp::BitOr, &lhs, &rhs))
}

/// Flatten nested unions and drop duplicates, preserving first appearance.
fn push_union_member(members: &mut Vec<Value>, value: Value) {
    match value {
        Value::Union(nested) => {
            for member in nested {
                push_union_member(members, member);
            }
        }
        other => {
            if !members.contains(&other) {
                members.push(other);
            }
        }
    }
}

/// `+`: numeric addition, string/list/tuple concatenation.
fn eval_add(lhs: Value, rhs: Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        (Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        }
        (Value::Tuple(mut a), Value::Tuple(b)) => {
            a.extend(b);
            Ok(Value::Tuple(a))
        }
        (lhs, rhs) => numeric_op(
            BinaryOp::Add,
            lhs,
            rhs,
            |a, b| a.checked_add(b),
            |a, b| a + b,
        ),
    }
}

/// `/`: always float division, faulting on a zero divisor.
fn eval_div(lhs: Value, rhs: Value) -> Result<Value> {
    let (a, b) = float_pair(BinaryOp::Div, &lhs, &rhs)?;
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Float(a / b))
}

/// `%`: integer or float remainder, faulting on a zero divisor.
fn eval_mod(lhs: Value, rhs: Value) -> Result<Value> {
    if let (Value::Int(a), Value::Int(b)) = (&lhs, &rhs) {
        if *b == 0 {
            return Err(EvalError::DivisionByZero);
        }
        return Ok(Value::Int(a.rem_euclid(*b)));
    }
    let (a, b) = float_pair(BinaryOp::Mod, &lhs, &rhs)?;
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Float(a.rem_euclid(b)))
}

/// `**`: integer power for non-negative integer exponents, float otherwise.
fn eval_pow(lhs: Value, rhs: Value) -> Result<Value> {
    if let (Value::Int(a), Value::Int(b)) = (&lhs, &rhs) {
        if *b >= 0 {
            let exp = u32::try_from(*b).map_err(|_| EvalError::NumericOverflow {
                op: "**".to_string(),
            })?;
            return a
                .checked_pow(exp)
                .map(Value::Int)
                .ok_or_else(|| EvalError::NumericOverflow {
                    op: "**".to_string(),
                });
        }
    }
    let (a, b) = float_pair(BinaryOp::Pow, &lhs, &rhs)?;
    Ok(Value::Float(a.powf(b)))
}

/// Apply a numeric operator with int/float promotion.
fn numeric_op(
    op: BinaryOp,
    lhs: Value,
    rhs: Value,
    int_op: impl Fn(i64, i64) -> Option<i64>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value> {
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => {
            int_op(*a, *b)
                .map(Value::Int)
                .ok_or_else(|| EvalError::NumericOverflow { op: op.to_string() })
        }
        _ => {
            let (a, b) = float_pair(op, &lhs, &rhs)?;
            Ok(Value::Float(float_op(a, b)))
        }
    }
}

/// Coerce both operands to floats, or report the mismatch.
fn float_pair(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<(f64, f64)> {
    let coerce = |value: &Value| match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    };
    match (coerce(lhs), coerce(rhs)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(type_mismatch(op, lhs, rhs)),
    }
}

/// Structural equality with int/float numeric comparison.
fn value_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        _ => lhs == rhs,
    }
}

/// Ordering comparisons: numbers with promotion, strings lexicographically.
fn eval_ordering(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
    let ordering = match (&lhs, &rhs) {
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        _ => {
            let (a, b) = float_pair(op, &lhs, &rhs)?;
            a.partial_cmp(&b).ok_or_else(|| type_mismatch(op, &lhs, &rhs))?
        }
    };
    let result = match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::Ge => ordering.is_ge(),
        _ => unreachable!("not an ordering operator: {}", op),
    };
    Ok(Value::Bool(result))
}

fn type_mismatch(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::TypeMismatch {
        op: op.to_string(),
        left: lhs.type_name().to_string(),
        right: rhs.type_name().to_string(),
    }
}
