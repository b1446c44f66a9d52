//! Statement parsing.

use crate::parser::Parser;
use monkey_lexer::token::TokenKind;
use monkey_types::ast::*;
use tracing::trace;

impl<'src> Parser<'src> {
    /// Parse a block of statements: `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            let before = self.current_span();
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            } else {
                self.synchronize();
                if self.current_span() == before && !self.check(&TokenKind::RBrace) {
                    self.advance();
                }
            }
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Block { stmts, span })
    }

    /// Parse a single statement, including its optional trailing `;`.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        trace!(token = %self.peek_kind(), "parse_statement");
        let stmt = match self.peek_kind() {
            TokenKind::Let => self.parse_let_stmt()?,
            TokenKind::Return => self.parse_return_stmt()?,
            TokenKind::While => self.parse_while_stmt()?,
            TokenKind::Identifier(_) if *self.look_ahead(1) == TokenKind::Assign => {
                self.parse_assign_stmt()?
            }
            _ => {
                let expr = self.parse_expression()?;
                let span = expr.span;
                Stmt::Expr(ExprStmt { expr, span })
            }
        };
        self.eat(&TokenKind::Semicolon);
        Some(stmt)
    }

    /// `let name = expr`
    fn parse_let_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `let`
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Assign)?;
        let value = self.parse_expression()?;
        let span = start.merge(value.span);
        Some(Stmt::Let(LetStmt { name, value, span }))
    }

    /// `name = expr`
    fn parse_assign_stmt(&mut self) -> Option<Stmt> {
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Assign)?;
        let value = self.parse_expression()?;
        let span = name.span.merge(value.span);
        Some(Stmt::Assign(AssignStmt { name, value, span }))
    }

    /// `return [expr]`
    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `return`
        let value = match self.peek_kind() {
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => None,
            _ => Some(self.parse_expression()?),
        };
        let span = value.as_ref().map_or(start, |v| start.merge(v.span));
        Some(Stmt::Return(ReturnStmt { value, span }))
    }

    /// `while (cond) { body }`
    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `while`
        let condition = self.parse_parenthesized_condition()?;
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Some(Stmt::While(WhileStmt {
            condition,
            body,
            span,
        }))
    }
}
