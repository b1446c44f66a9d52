//! Monkey tree-walking evaluator.
//!
//! Three pieces, leaves first:
//! - [`object`]: runtime values and their equality/formatting rules
//! - [`env`]: chained lexical scopes shared by reference between closures
//! - [`evaluator`]: the recursive walk from AST node to [`Object`]
//!
//! A host parses source, creates one root [`Environment`] and calls
//! [`eval`] once. Failures come back as an ordinary [`Object::Error`].

pub mod env;
pub mod error;
pub mod evaluator;
pub mod limits;
pub mod object;
mod stack;

pub use env::Environment;
pub use error::{EvalError, EvalResult, Signal};
pub use evaluator::{eval, Evaluator};
pub use limits::EvalLimits;
pub use object::{Function, Object, ObjectKind, FALSE, NULL, TRUE};

use monkey_parser::parse_source;
use monkey_types::{SourceFile, SyntaxErrors};

/// Parse and evaluate `source` in a fresh root environment.
pub fn run(source: &str) -> Result<Object, SyntaxErrors> {
    run_in(source, &Environment::new(), EvalLimits::default())
}

/// Parse and evaluate `source` in `env`, so bindings persist across runs.
pub fn run_in(source: &str, env: &Environment, limits: EvalLimits) -> Result<Object, SyntaxErrors> {
    let source_file = SourceFile::new("<input>", source);
    let parsed = parse_source(&source_file);
    if parsed.errors.has_errors() {
        return Err(parsed.errors);
    }
    Ok(Evaluator::with_limits(limits).eval_program(&parsed.program, env))
}
