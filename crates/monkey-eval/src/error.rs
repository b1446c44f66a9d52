//! Runtime error and control-flow types for the Monkey evaluator.

use crate::object::{Object, ObjectKind};
use monkey_types::ast::{InfixOp, PrefixOp};
use thiserror::Error;

/// A failed evaluation. The `Display` text is the message a Monkey program
/// sees in its `Error` object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Operand kinds differ, e.g. `5 + true`.
    #[error("type mismatch: {left} {op} {right}")]
    TypeMismatch {
        left: ObjectKind,
        op: InfixOp,
        right: ObjectKind,
    },

    /// Prefix operator not defined for the operand kind, e.g. `-true`.
    #[error("unknown operator: {op}{operand}")]
    UnknownPrefixOperator { op: PrefixOp, operand: ObjectKind },

    /// Infix operator not defined for the operand kinds, e.g. `"a" - "b"`.
    #[error("unknown operator: {left} {op} {right}")]
    UnknownInfixOperator {
        left: ObjectKind,
        op: InfixOp,
        right: ObjectKind,
    },

    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),

    /// `let` of a name already bound in the same scope.
    #[error("Identifier '{0}' has already been declared")]
    AlreadyDeclared(String),

    /// Assignment to a name with no binding in the current scope.
    #[error("{0} is not defined")]
    NotDefined(String),

    #[error("not a function: {0}")]
    NotCallable(ObjectKind),

    #[error("division by zero")]
    DivisionByZero,

    /// Result does not fit in 64 bits; carries the offending expression.
    #[error("integer overflow: {0}")]
    IntegerOverflow(String),

    /// `++` applied to something other than a variable.
    #[error("invalid increment target: {0}")]
    InvalidIncrementTarget(String),

    #[error("gas exhausted after {0} steps")]
    GasExhausted(u64),

    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
}

/// Why evaluation of a node stopped early.
///
/// Both variants short-circuit every enclosing node via `?`. A `Return` is
/// caught at the nearest function call (or the program itself); an `Error`
/// is never caught and surfaces as the program's result.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Return(Object),
    Error(EvalError),
}

impl Signal {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Signal::Return(_) => ObjectKind::ReturnValue,
            Signal::Error(_) => ObjectKind::Error,
        }
    }
}

impl From<EvalError> for Signal {
    fn from(err: EvalError) -> Self {
        Signal::Error(err)
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, Signal>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let mismatch = EvalError::TypeMismatch {
            left: ObjectKind::Integer,
            op: InfixOp::Add,
            right: ObjectKind::Boolean,
        };
        assert_eq!(mismatch.to_string(), "type mismatch: INTEGER + BOOLEAN");

        let prefix = EvalError::UnknownPrefixOperator {
            op: PrefixOp::Neg,
            operand: ObjectKind::Boolean,
        };
        assert_eq!(prefix.to_string(), "unknown operator: -BOOLEAN");

        let infix = EvalError::UnknownInfixOperator {
            left: ObjectKind::String,
            op: InfixOp::Sub,
            right: ObjectKind::String,
        };
        assert_eq!(infix.to_string(), "unknown operator: STRING - STRING");

        assert_eq!(
            EvalError::IdentifierNotFound("foobar".into()).to_string(),
            "identifier not found: foobar"
        );
        assert_eq!(
            EvalError::NotCallable(ObjectKind::Integer).to_string(),
            "not a function: INTEGER"
        );
    }

    #[test]
    fn test_signal_from_error() {
        let signal: Signal = EvalError::DivisionByZero.into();
        assert_eq!(signal.kind(), ObjectKind::Error);
        assert_eq!(Signal::Return(Object::Null).kind(), ObjectKind::ReturnValue);
    }
}
