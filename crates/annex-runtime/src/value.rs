//! The value domain annotation expressions evaluate into.
//!
//! Annotations are ordinary expressions, so the domain covers literals,
//! containers, and host objects — not just type-shaped values. Class
//! objects carry an attribute table so dotted references
//! (`Outer.Inner.field`) resolve through plain attribute access, and the
//! `|` operator builds unions of class-like values.

use crate::error::EvalError;
use annex_ast::QualifiedPath;
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Function signature for host-supplied callables.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync>;

/// A host-supplied callable value.
///
/// Calls are the one way an annotation expression can have observable side
/// effects, which is why bulk resolution evaluates slots strictly in
/// declaration order.
#[derive(Clone)]
pub struct Native {
    /// Display name, used in error messages
    pub name: String,
    func: NativeFn,
}

impl Native {
    /// Wrap a host function under a display name.
    pub fn new(name: impl Into<String>, func: NativeFn) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    /// Invoke the callable.
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.func)(args)
    }

    fn fn_addr(&self) -> usize {
        Arc::as_ptr(&self.func) as *const () as usize
    }
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Native({})", self.name)
    }
}

impl PartialEq for Native {
    /// Callables compare by identity, never structurally.
    fn eq(&self, other: &Self) -> bool {
        self.fn_addr() == other.fn_addr()
    }
}

/// A class-like object: the typical referent of a forward reference.
///
/// Identity is the qualified path; two values naming the same path are the
/// same class, so scope snapshots compare equal to the live scope.
#[derive(Debug, Clone)]
pub struct ClassObject {
    /// Qualified path from the module root (`Outer.Inner`)
    pub path: QualifiedPath,
    /// Attribute table: nested classes, class fields, methods
    pub attrs: IndexMap<String, Value>,
}

impl ClassObject {
    /// Create a class with an empty attribute table.
    pub fn new(path: impl Into<QualifiedPath>) -> Self {
        Self {
            path: path.into(),
            attrs: IndexMap::new(),
        }
    }

    /// Builder-style attribute insertion.
    pub fn with_attr(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    /// The unqualified class name (last path segment).
    pub fn name(&self) -> &str {
        self.path.leaf().unwrap_or("")
    }
}

impl PartialEq for ClassObject {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

/// Runtime value of a resolved annotation expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    Str(String),
    /// List display result
    List(Vec<Value>),
    /// Tuple display result
    Tuple(Vec<Value>),
    /// Class object (shared: scopes and attribute tables alias it)
    Class(Arc<ClassObject>),
    /// Subscripted class: `List[Int]`
    Generic {
        /// The subscripted base
        base: Box<Value>,
        /// Subscript arguments
        args: Vec<Value>,
    },
    /// Union of class-like values: `Config | None`
    ///
    /// Flattened and duplicate-free; order follows first appearance.
    Union(Vec<Value>),
    /// Host-supplied callable
    Native(Native),
}

impl Value {
    /// Convenience constructor for a class value.
    pub fn class(object: ClassObject) -> Self {
        Value::Class(Arc::new(object))
    }

    /// Convenience constructor for a native callable.
    pub fn native(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        Value::Native(Native::new(name, Arc::new(func)))
    }

    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Class(_) => "class",
            Value::Generic { .. } => "generic",
            Value::Union(_) => "union",
            Value::Native(_) => "native",
        }
    }

    /// Truthiness, for `and` / `or` / `not`.
    ///
    /// Empty containers, zero numbers, the empty string, `False`, and
    /// `None` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Class(_) | Value::Generic { .. } | Value::Union(_) | Value::Native(_) => true,
        }
    }

    /// Whether `|` composes this value into a union rather than a number.
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            Value::None | Value::Class(_) | Value::Generic { .. } | Value::Union(_)
        )
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassObject> {
        match self {
            Value::Class(object) => Some(object),
            _ => None,
        }
    }

    /// Structural fingerprint for cache keying.
    ///
    /// Two values with equal fingerprints are interchangeable as bindings
    /// for caching purposes. Floats hash by bit pattern, classes by path,
    /// natives by function identity.
    pub fn fingerprint<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::None => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(x) => x.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::List(items) | Value::Tuple(items) => {
                items.len().hash(state);
                for item in items {
                    item.fingerprint(state);
                }
            }
            Value::Class(object) => object.path.hash(state),
            Value::Generic { base, args } => {
                base.fingerprint(state);
                args.len().hash(state);
                for arg in args {
                    arg.fingerprint(state);
                }
            }
            Value::Union(members) => {
                members.len().hash(state);
                for member in members {
                    member.fingerprint(state);
                }
            }
            Value::Native(native) => native.fn_addr().hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Class(object) => write!(f, "<class {}>", object.path),
            Value::Generic { base, args } => {
                write!(f, "{}[", base)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, "]")
            }
            Value::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            Value::Native(native) => write!(f, "<native {}>", native.name),
        }
    }
}
