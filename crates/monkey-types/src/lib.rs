//! Shared types for the Monkey interpreter.
//!
//! This crate defines the AST node types, source spans and syntax error
//! types shared by the lexer, the parser and the evaluator.

mod error;
mod span;
pub mod ast;

pub use error::{ErrorCategory, ErrorCode, SyntaxError, SyntaxErrors, MAX_ERRORS};
pub use span::{SourceFile, Span};
