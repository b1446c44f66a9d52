//! Runtime values of the Monkey language.
//!
//! Values are immutable once built; rebinding happens in an [`Environment`],
//! never inside an [`Object`].

use crate::env::Environment;
use monkey_types::ast::{Block, Ident};
use std::fmt;
use std::rc::Rc;

/// The canonical `true`.
pub const TRUE: Object = Object::Boolean(true);
/// The canonical `false`.
pub const FALSE: Object = Object::Boolean(false);
/// The canonical null value.
pub const NULL: Object = Object::Null;

/// A Monkey runtime value.
///
/// `Object::Error` only appears at the evaluation boundary: inside the
/// evaluator failures travel as [`crate::Signal::Error`] and are folded
/// into this variant by [`crate::Evaluator::eval_program`].
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    Function(Rc<Function>),
    Error(String),
}

impl Object {
    /// Map a host `bool` onto [`TRUE`] / [`FALSE`].
    pub fn from_bool(value: bool) -> Object {
        if value {
            TRUE
        } else {
            FALSE
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Integer(_) => ObjectKind::Integer,
            Object::Boolean(_) => ObjectKind::Boolean,
            Object::String(_) => ObjectKind::String,
            Object::Null => ObjectKind::Null,
            Object::Function(_) => ObjectKind::Function,
            Object::Error(_) => ObjectKind::Error,
        }
    }

    /// Everything is truthy except `false` and null.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }
}

/// Integers, strings, booleans and null compare by value; functions compare
/// by identity.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Error(a), Object::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Integer(value)
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Object::from_bool(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::String(Rc::from(value))
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Object::String(Rc::from(value))
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{n}"),
            Object::Boolean(b) => write!(f, "{b}"),
            Object::String(s) => f.write_str(s),
            Object::Null => f.write_str("null"),
            Object::Function(func) => write!(f, "{func}"),
            Object::Error(message) => write!(f, "ERROR: {message}"),
        }
    }
}

/// Kind tag of a value, as it appears in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Integer,
    Boolean,
    String,
    Null,
    Function,
    ReturnValue,
    Error,
}

impl ObjectKind {
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Integer => "INTEGER",
            ObjectKind::Boolean => "BOOLEAN",
            ObjectKind::String => "STRING",
            ObjectKind::Null => "NULL",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::ReturnValue => "RETURN_VALUE",
            ObjectKind::Error => "ERROR",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════════════════════

/// A closure: parameters and body plus the scope it was created in.
///
/// The scope is held by reference, so later changes to it are visible to
/// the function.
pub struct Function {
    pub params: Vec<Ident>,
    pub body: Rc<Block>,
    pub env: Environment,
}

impl Function {
    pub fn new(params: Vec<Ident>, body: Rc<Block>, env: Environment) -> Self {
        Self { params, body, env }
    }
}

// The captured scope usually contains the function itself, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("body", &self.body.to_string())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
        write!(f, "fn({}) {{\n{}\n}}", params.join(", "), self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monkey_types::Span;

    fn identity_function(env: &Environment) -> Rc<Function> {
        let body = Block {
            stmts: Vec::new(),
            span: Span::default(),
        };
        Rc::new(Function::new(
            vec![Ident::new("x", Span::default())],
            Rc::new(body),
            env.clone(),
        ))
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Object::Integer(1).kind().to_string(), "INTEGER");
        assert_eq!(TRUE.kind().to_string(), "BOOLEAN");
        assert_eq!(Object::from("s").kind().to_string(), "STRING");
        assert_eq!(NULL.kind().to_string(), "NULL");
        assert_eq!(Object::Error("e".into()).kind().to_string(), "ERROR");
        assert_eq!(ObjectKind::ReturnValue.to_string(), "RETURN_VALUE");
    }

    #[test]
    fn test_truthiness() {
        assert!(!FALSE.is_truthy());
        assert!(!NULL.is_truthy());
        assert!(TRUE.is_truthy());
        assert!(Object::Integer(0).is_truthy());
        assert!(Object::from("").is_truthy());
    }

    #[test]
    fn test_from_bool_is_canonical() {
        assert_eq!(Object::from_bool(true), TRUE);
        assert_eq!(Object::from_bool(false), FALSE);
        assert_ne!(TRUE, FALSE);
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(Object::Integer(7), Object::Integer(7));
        assert_eq!(Object::from("abc"), Object::from(String::from("abc")));
        assert_ne!(Object::Integer(1), TRUE);
        assert_ne!(NULL, FALSE);
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let env = Environment::new();
        let f = identity_function(&env);
        let g = identity_function(&env);
        assert_eq!(Object::Function(f.clone()), Object::Function(f));
        assert_ne!(
            Object::Function(identity_function(&env)),
            Object::Function(g)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Object::Integer(-3).to_string(), "-3");
        assert_eq!(FALSE.to_string(), "false");
        assert_eq!(Object::from("hi").to_string(), "hi");
        assert_eq!(NULL.to_string(), "null");
        assert_eq!(
            Object::Error("boom".into()).to_string(),
            "ERROR: boom"
        );
        let env = Environment::new();
        assert_eq!(
            Object::Function(identity_function(&env)).to_string(),
            "fn(x) {\n\n}"
        );
    }
}
