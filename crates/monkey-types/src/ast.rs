//! AST node types for the Monkey language.
//!
//! Every node carries a [`Span`] for error reporting. `Display` renders the
//! canonical fully-parenthesised form, e.g. `(5 + (2 * 10))`, which is what
//! parser tests and diagnostics compare against.

use crate::Span;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete Monkey program: a sequence of top-level statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.statements.iter().try_for_each(|stmt| write!(f, "{stmt}"))
    }
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// `{ statements... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.stmts.iter().try_for_each(|stmt| write!(f, "{stmt}"))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// `let name = expr;`
    Let(LetStmt),
    /// `name = expr;`
    Assign(AssignStmt),
    /// `return [expr];`
    Return(ReturnStmt),
    /// `while (cond) { ... }`
    While(WhileStmt),
    /// A bare expression; its value is the statement's value.
    Expr(ExprStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(s) => write!(f, "let {} = {};", s.name, s.value),
            Stmt::Assign(s) => write!(f, "{} = {};", s.name, s.value),
            Stmt::Return(ReturnStmt { value: Some(v), .. }) => write!(f, "return {v};"),
            Stmt::Return(ReturnStmt { value: None, .. }) => write!(f, "return;"),
            Stmt::While(s) => write!(f, "while {} {}", s.condition, s.body),
            Stmt::Expr(s) => write!(f, "{}", s.expr),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetStmt {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignStmt {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStmt {
    /// `None` for a bare `return;`, which returns null.
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    // ── Literals ──
    /// `42`
    IntegerLit(i64),
    /// `"hello"`, escapes already resolved
    StringLit(String),
    /// `true` / `false`
    BoolLit(bool),

    /// `my_var`
    Identifier(String),

    // ── Operators ──
    /// `-x`, `!x`, `++x`
    Prefix { op: PrefixOp, operand: Box<Expr> },
    /// `a + b`, `a == b`, ...
    Infix {
        left: Box<Expr>,
        op: InfixOp,
        right: Box<Expr>,
    },

    /// `if (cond) { ... } [else { ... }]`
    If(Box<IfExpr>),
    /// `fn(params) { body }`
    Function(FunctionLit),
    /// `callee(args...)`
    Call { callee: Box<Expr>, args: Vec<Expr> },
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::IntegerLit(n) => write!(f, "{n}"),
            ExprKind::StringLit(s) => write!(f, "{s:?}"),
            ExprKind::BoolLit(b) => write!(f, "{b}"),
            ExprKind::Identifier(name) => f.write_str(name),
            ExprKind::Prefix { op, operand } => write!(f, "({op}{operand})"),
            ExprKind::Infix { left, op, right } => write!(f, "({left} {op} {right})"),
            ExprKind::If(if_expr) => {
                write!(f, "if {} {}", if_expr.condition, if_expr.consequence)?;
                if let Some(alt) = &if_expr.alternative {
                    write!(f, " else {alt}")?;
                }
                Ok(())
            }
            ExprKind::Function(func) => write!(f, "{func}"),
            ExprKind::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_comma_separated(f, args)?;
                f.write_str(")")
            }
        }
    }
}

fn write_comma_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfExpr {
    pub condition: Expr,
    pub consequence: Block,
    pub alternative: Option<Block>,
    pub span: Span,
}

/// `fn(params) { body }`
///
/// The body is reference-counted so function objects created at runtime can
/// share it with the AST instead of copying it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionLit {
    pub params: Vec<Ident>,
    pub body: Rc<Block>,
    pub span: Span,
}

impl fmt::Display for FunctionLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        write_comma_separated(f, &self.params)?;
        write!(f, ") {}", self.body)
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOp {
    /// `!`: logical negation by truthiness
    Bang,
    /// `-`: integer negation
    Neg,
    /// `++`: increment an integer variable in place
    Increment,
}

impl PrefixOp {
    pub fn symbol(self) -> &'static str {
        match self {
            PrefixOp::Bang => "!",
            PrefixOp::Neg => "-",
            PrefixOp::Increment => "++",
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Binary operators, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOp {
    // Equality
    Eq,
    NotEq,
    // Ordering
    Lt,
    Gt,
    // Additive
    Add,
    Sub,
    // Multiplicative
    Mul,
    Div,
}

impl InfixOp {
    pub fn symbol(self) -> &'static str {
        match self {
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
