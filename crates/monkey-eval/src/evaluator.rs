//! Core expression and statement evaluator.

use crate::env::Environment;
use crate::error::{EvalError, EvalResult, Signal};
use crate::limits::EvalLimits;
use crate::object::{Function, Object, FALSE, NULL, TRUE};
use crate::stack::ensure_sufficient_stack;
use monkey_types::ast::*;
use std::rc::Rc;
use tracing::{debug, trace};

/// The core evaluator: walks AST nodes and produces Objects.
#[derive(Debug, Default)]
pub struct Evaluator {
    limits: EvalLimits,
    /// Steps taken so far; only counted when a gas limit is set.
    gas: u64,
    /// Number of function calls currently executing.
    depth: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: EvalLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn gas_used(&self) -> u64 {
        self.gas
    }

    fn tick(&mut self) -> EvalResult<()> {
        if let Some(limit) = self.limits.gas_limit {
            self.gas += 1;
            if self.gas > limit {
                return Err(EvalError::GasExhausted(limit).into());
            }
        }
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate a whole program in `env`.
    ///
    /// This is the boundary where signals become plain values: a top-level
    /// `return` yields its value, and an error yields [`Object::Error`].
    pub fn eval_program(&mut self, program: &Program, env: &Environment) -> Object {
        debug!(statements = program.statements.len(), "evaluating program");
        let mut result = NULL;
        for stmt in &program.statements {
            let signal = match self.eval_stmt(stmt, env) {
                Ok(value) => {
                    result = value;
                    continue;
                }
                Err(signal) => signal,
            };
            debug!(kind = %signal.kind(), span = %stmt.span(), "program stopped early");
            match signal {
                Signal::Return(value) => {
                    result = value;
                    break;
                }
                Signal::Error(err) => {
                    debug!(error = %err, "evaluation failed");
                    return Object::Error(err.to_string());
                }
            }
        }
        debug!(kind = %result.kind(), gas = self.gas, "evaluation finished");
        result
    }

    // ══════════════════════════════════════════════════════════════════════
    // Block & Statement execution
    // ══════════════════════════════════════════════════════════════════════

    /// Execute statements in order; the block's value is the last one's.
    pub fn eval_block(&mut self, block: &Block, env: &Environment) -> EvalResult<Object> {
        ensure_sufficient_stack(|| {
            let mut last = NULL;
            for stmt in &block.stmts {
                last = self.eval_stmt(stmt, env)?;
            }
            Ok(last)
        })
    }

    pub fn eval_stmt(&mut self, stmt: &Stmt, env: &Environment) -> EvalResult<Object> {
        self.tick()?;
        match stmt {
            Stmt::Let(let_stmt) => {
                let value = self.eval_expr(&let_stmt.value, env)?;
                Ok(env.set(&let_stmt.name.name, value)?)
            }
            Stmt::Assign(assign) => {
                let value = self.eval_expr(&assign.value, env)?;
                Ok(env.update(&assign.name.name, value)?)
            }
            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => NULL,
                };
                Err(Signal::Return(value))
            }
            Stmt::While(while_stmt) => self.eval_while(while_stmt, env),
            Stmt::Expr(expr_stmt) => self.eval_expr(&expr_stmt.expr, env),
        }
    }

    /// The body runs in the enclosing scope, so its bindings persist
    /// across iterations.
    fn eval_while(&mut self, while_stmt: &WhileStmt, env: &Environment) -> EvalResult<Object> {
        while self.eval_expr(&while_stmt.condition, env)?.is_truthy() {
            self.eval_block(&while_stmt.body, env)?;
        }
        Ok(NULL)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Object> {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Object> {
        self.tick()?;
        match &expr.kind {
            ExprKind::IntegerLit(n) => Ok(Object::Integer(*n)),
            ExprKind::StringLit(s) => Ok(Object::from(s.as_str())),
            ExprKind::BoolLit(b) => Ok(Object::from_bool(*b)),

            ExprKind::Identifier(name) => env
                .get(name)
                .ok_or_else(|| EvalError::IdentifierNotFound(name.clone()).into()),

            ExprKind::Prefix { op, operand } => self.eval_prefix(*op, operand, env),
            ExprKind::Infix { left, op, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                Ok(eval_infix(*op, &left, &right)?)
            }

            ExprKind::If(if_expr) => self.eval_if(if_expr, env),
            ExprKind::Function(func) => Ok(Object::Function(Rc::new(Function::new(
                func.params.clone(),
                Rc::clone(&func.body),
                env.clone(),
            )))),
            ExprKind::Call { callee, args } => self.eval_call(callee, args, env),
        }
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_prefix(&mut self, op: PrefixOp, operand: &Expr, env: &Environment) -> EvalResult<Object> {
        if op == PrefixOp::Increment {
            return self.eval_increment(operand, env);
        }
        let value = self.eval_expr(operand, env)?;
        match (op, &value) {
            (PrefixOp::Bang, _) => Ok(Object::from_bool(!value.is_truthy())),
            (PrefixOp::Neg, Object::Integer(n)) => n
                .checked_neg()
                .map(Object::Integer)
                .ok_or_else(|| EvalError::IntegerOverflow(format!("-{n}")).into()),
            _ => Err(EvalError::UnknownPrefixOperator {
                op,
                operand: value.kind(),
            }
            .into()),
        }
    }

    /// `++name`: rebinds `name` in the current scope to its value plus one.
    fn eval_increment(&mut self, operand: &Expr, env: &Environment) -> EvalResult<Object> {
        let ExprKind::Identifier(name) = &operand.kind else {
            return Err(EvalError::InvalidIncrementTarget(operand.to_string()).into());
        };
        let current = env
            .get(name)
            .ok_or_else(|| EvalError::IdentifierNotFound(name.clone()))?;
        match current {
            Object::Integer(n) => {
                let next = n
                    .checked_add(1)
                    .ok_or_else(|| EvalError::IntegerOverflow(format!("{n} + 1")))?;
                Ok(env.upsert(name, Object::Integer(next)))
            }
            other => Err(EvalError::UnknownPrefixOperator {
                op: PrefixOp::Increment,
                operand: other.kind(),
            }
            .into()),
        }
    }

    // ── Control Flow ─────────────────────────────────────────────────────

    fn eval_if(&mut self, if_expr: &IfExpr, env: &Environment) -> EvalResult<Object> {
        let condition = self.eval_expr(&if_expr.condition, env)?;
        if condition.is_truthy() {
            self.eval_block(&if_expr.consequence, env)
        } else if let Some(alternative) = &if_expr.alternative {
            self.eval_block(alternative, env)
        } else {
            Ok(NULL)
        }
    }

    // ── Calls ────────────────────────────────────────────────────────────

    #[tracing::instrument(level = "debug", skip_all, fields(args = args.len()))]
    fn eval_call(&mut self, callee: &Expr, args: &[Expr], env: &Environment) -> EvalResult<Object> {
        let function = match self.eval_expr(callee, env)? {
            Object::Function(function) => function,
            other => return Err(EvalError::NotCallable(other.kind()).into()),
        };
        let mut arg_vals = Vec::with_capacity(args.len());
        for arg in args {
            arg_vals.push(self.eval_expr(arg, env)?);
        }

        if let Some(max) = self.limits.max_call_depth {
            if self.depth >= max {
                return Err(EvalError::CallDepthExceeded(max).into());
            }
        }
        self.depth += 1;
        let result = self.apply_function(&function, arg_vals);
        self.depth -= 1;
        result
    }

    /// Run `function` in a new scope enclosing its captured scope.
    ///
    /// Missing arguments are bound to null and extra ones are ignored. A
    /// `return` inside the body ends here.
    fn apply_function(&mut self, function: &Function, args: Vec<Object>) -> EvalResult<Object> {
        trace!(depth = self.depth, params = function.params.len(), "enter call frame");
        let frame = Environment::enclosed(&function.env);
        let mut args = args.into_iter();
        for param in &function.params {
            frame.set(&param.name, args.next().unwrap_or(NULL))?;
        }
        match self.eval_block(&function.body, &frame) {
            Err(Signal::Return(value)) => Ok(value),
            other => other,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Infix operators
// ══════════════════════════════════════════════════════════════════════════

fn eval_infix(op: InfixOp, left: &Object, right: &Object) -> Result<Object, EvalError> {
    match (left, right) {
        (Object::Integer(a), Object::Integer(b)) => eval_integer_infix(op, *a, *b),
        (Object::String(a), Object::String(b)) => match op {
            InfixOp::Add => Ok(Object::from(format!("{a}{b}"))),
            InfixOp::Eq => Ok(Object::from_bool(a == b)),
            InfixOp::NotEq => Ok(Object::from_bool(a != b)),
            _ => Err(unknown_infix(op, left, right)),
        },
        _ if left.kind() != right.kind() => Err(EvalError::TypeMismatch {
            left: left.kind(),
            op,
            right: right.kind(),
        }),
        _ => match op {
            InfixOp::Eq => Ok(Object::from_bool(left == right)),
            InfixOp::NotEq => Ok(Object::from_bool(left != right)),
            _ => Err(unknown_infix(op, left, right)),
        },
    }
}

fn eval_integer_infix(op: InfixOp, a: i64, b: i64) -> Result<Object, EvalError> {
    let checked = match op {
        InfixOp::Add => a.checked_add(b),
        InfixOp::Sub => a.checked_sub(b),
        InfixOp::Mul => a.checked_mul(b),
        InfixOp::Div => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            a.checked_div(b)
        }
        InfixOp::Lt => return Ok(if a < b { TRUE } else { FALSE }),
        InfixOp::Gt => return Ok(if a > b { TRUE } else { FALSE }),
        InfixOp::Eq => return Ok(Object::from_bool(a == b)),
        InfixOp::NotEq => return Ok(Object::from_bool(a != b)),
    };
    checked
        .map(Object::Integer)
        .ok_or_else(|| EvalError::IntegerOverflow(format!("{a} {op} {b}")))
}

fn unknown_infix(op: InfixOp, left: &Object, right: &Object) -> EvalError {
    EvalError::UnknownInfixOperator {
        left: left.kind(),
        op,
        right: right.kind(),
    }
}

/// Evaluate `program` in `env` with no resource limits.
pub fn eval(program: &Program, env: &Environment) -> Object {
    Evaluator::new().eval_program(program, env)
}
