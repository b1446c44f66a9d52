//! Expression parsing by precedence climbing.
//!
//! Precedence (lowest → highest):
//! 1. `==`, `!=`
//! 2. `<`, `>`
//! 3. `+`, `-`
//! 4. `*`, `/`
//! 5. prefix `-`, `!`, `++`
//! 6. call `f(args)`
//!
//! All binary operators are left-associative.

use std::rc::Rc;

use monkey_lexer::token::TokenKind;
use monkey_types::ast::*;
use monkey_types::ErrorCode;
use tracing::trace;

use crate::parser::{Parser, MAX_EXPR_DEPTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

fn infix_binding(kind: &TokenKind) -> Option<(InfixOp, Precedence)> {
    let binding = match kind {
        TokenKind::EqEq => (InfixOp::Eq, Precedence::Equals),
        TokenKind::BangEq => (InfixOp::NotEq, Precedence::Equals),
        TokenKind::Less => (InfixOp::Lt, Precedence::LessGreater),
        TokenKind::Greater => (InfixOp::Gt, Precedence::LessGreater),
        TokenKind::Plus => (InfixOp::Add, Precedence::Sum),
        TokenKind::Minus => (InfixOp::Sub, Precedence::Sum),
        TokenKind::Star => (InfixOp::Mul, Precedence::Product),
        TokenKind::Slash => (InfixOp::Div, Precedence::Product),
        _ => return None,
    };
    Some(binding)
}

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_expr_bp(Precedence::Lowest)
    }

    /// `( expr )` as required around `if` and `while` conditions.
    pub(crate) fn parse_parenthesized_condition(&mut self) -> Option<Expr> {
        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Some(condition)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Climbing
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_expr_bp(&mut self, min: Precedence) -> Option<Expr> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("maximum expression nesting depth is {MAX_EXPR_DEPTH}"),
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = self.parse_expr_bp_inner(min);
        self.expr_depth -= 1;
        result
    }

    fn parse_expr_bp_inner(&mut self, min: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;
        loop {
            if self.check(&TokenKind::LParen) {
                if min >= Precedence::Call {
                    break;
                }
                left = self.parse_call(left)?;
                continue;
            }
            let Some((op, prec)) = infix_binding(self.peek_kind()) else {
                break;
            };
            if prec <= min {
                break;
            }
            self.advance(); // consume operator
            let right = self.parse_expr_bp(prec)?;
            let span = left.span.merge(right.span);
            trace!(%op, "parsed infix");
            left = Expr::new(
                ExprKind::Infix {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Prefix Position
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_prefix(&mut self) -> Option<Expr> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            // ── Literals ────────────────────────────────────────────────
            TokenKind::Int(n) => {
                self.advance();
                Some(Expr::new(ExprKind::IntegerLit(n), start))
            }
            TokenKind::Str(s) => {
                self.advance();
                Some(Expr::new(ExprKind::StringLit(s), start))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(true), start))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(false), start))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Some(Expr::new(ExprKind::Identifier(name), start))
            }

            // ── Operators ───────────────────────────────────────────────
            TokenKind::Bang => self.parse_prefix_op(PrefixOp::Bang),
            TokenKind::Minus => self.parse_prefix_op(PrefixOp::Neg),
            TokenKind::PlusPlus => self.parse_prefix_op(PrefixOp::Increment),

            // ── Grouping ────────────────────────────────────────────────
            TokenKind::LParen => {
                self.advance(); // eat `(`
                let mut inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                inner.span = start.merge(self.previous_span());
                Some(inner)
            }

            TokenKind::If => self.parse_if_expr(),
            TokenKind::Fn => self.parse_function_literal(),

            other => {
                self.error_at_current(
                    ErrorCode::EXPECTED_EXPRESSION,
                    format!("expected expression, got '{other}'"),
                );
                None
            }
        }
    }

    fn parse_prefix_op(&mut self, op: PrefixOp) -> Option<Expr> {
        let start = self.advance().span; // eat operator
        let operand = self.parse_expr_bp(Precedence::Prefix)?;
        if op == PrefixOp::Increment && !matches!(operand.kind, ExprKind::Identifier(_)) {
            self.error_at(
                ErrorCode::INVALID_INCREMENT_TARGET,
                format!("'++' needs a variable name, got '{operand}'"),
                operand.span,
            );
            return None;
        }
        let span = start.merge(operand.span);
        Some(Expr::new(
            ExprKind::Prefix {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Compound Expressions
    // ══════════════════════════════════════════════════════════════════════════

    /// `if (cond) { ... } [else { ... }]`
    fn parse_if_expr(&mut self) -> Option<Expr> {
        let start = self.advance().span; // eat `if`
        let condition = self.parse_parenthesized_condition()?;
        let consequence = self.parse_block()?;
        let alternative = if self.eat(&TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        let span = start.merge(self.previous_span());
        Some(Expr::new(
            ExprKind::If(Box::new(IfExpr {
                condition,
                consequence,
                alternative,
                span,
            })),
            span,
        ))
    }

    /// `fn(a, b) { body }`
    fn parse_function_literal(&mut self) -> Option<Expr> {
        let start = self.advance().span; // eat `fn`
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.expect_identifier()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Some(Expr::new(
            ExprKind::Function(FunctionLit {
                params,
                body: Rc::new(body),
                span,
            }),
            span,
        ))
    }

    /// `callee(args...)`; the callee has already been parsed.
    fn parse_call(&mut self, callee: Expr) -> Option<Expr> {
        self.advance(); // eat `(`
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        let span = callee.span.merge(self.previous_span());
        Some(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }
}
