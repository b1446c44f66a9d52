//! Parser tests: statements, precedence, compound expressions, spans and
//! error recovery.

use monkey_lexer::Lexer;
use monkey_parser::{parse_source, Parser, MAX_EXPR_DEPTH};
use monkey_types::ast::*;
use monkey_types::{ErrorCode, SourceFile, SyntaxErrors};
use pretty_assertions::assert_eq;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Parse source that must be valid.
fn parse(source: &str) -> Program {
    let sf = SourceFile::new("test.monkey", source);
    let lex = Lexer::new(&sf).lex();
    assert!(
        !lex.errors.has_errors(),
        "unexpected lex errors: {}",
        lex.errors
    );
    let result = Parser::new(lex.tokens, &sf).parse();
    assert!(
        !result.errors.has_errors(),
        "unexpected parse errors: {}",
        result.errors
    );
    result.program
}

/// Parse source that must fail; returns the collected errors.
fn parse_errors(source: &str) -> SyntaxErrors {
    let sf = SourceFile::new("test.monkey", source);
    let result = parse_source(&sf);
    assert!(result.errors.has_errors(), "expected errors for {source:?}");
    result.errors
}

fn codes(errors: &SyntaxErrors) -> Vec<ErrorCode> {
    errors.errors.iter().map(|e| e.code).collect()
}

/// Parse a single expression statement and return its expression.
fn parse_expr(source: &str) -> Expr {
    let mut program = parse(source);
    assert_eq!(program.statements.len(), 1, "expected one statement");
    match program.statements.remove(0) {
        Stmt::Expr(stmt) => stmt.expr,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_let_statements() {
    let program = parse("let x = 5; let y = true; let foobar = y;");
    assert_eq!(program.statements.len(), 3);
    let names: Vec<&str> = program
        .statements
        .iter()
        .map(|stmt| match stmt {
            Stmt::Let(let_stmt) => let_stmt.name.name.as_str(),
            other => panic!("expected let, got {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["x", "y", "foobar"]);
    assert_eq!(program.to_string(), "let x = 5;let y = true;let foobar = y;");
}

#[test]
fn test_assign_statement() {
    let program = parse("a = a * 5;");
    let Stmt::Assign(assign) = &program.statements[0] else {
        panic!("expected assignment");
    };
    assert_eq!(assign.name.name, "a");
    assert_eq!(assign.value.to_string(), "(a * 5)");
}

#[test]
fn test_equality_is_not_assignment() {
    let expr = parse_expr("a == 5");
    assert_eq!(expr.to_string(), "(a == 5)");
}

#[test]
fn test_return_statements() {
    let program = parse("return 5; return x + y; return;");
    let values: Vec<Option<String>> = program
        .statements
        .iter()
        .map(|stmt| match stmt {
            Stmt::Return(ret) => ret.value.as_ref().map(|v| v.to_string()),
            other => panic!("expected return, got {other:?}"),
        })
        .collect();
    assert_eq!(
        values,
        vec![Some("5".to_string()), Some("(x + y)".to_string()), None]
    );
}

#[test]
fn test_bare_return_before_closing_brace() {
    let expr = parse_expr("fn() { return }");
    let ExprKind::Function(func) = expr.kind else {
        panic!("expected function literal");
    };
    assert!(matches!(
        func.body.stmts.as_slice(),
        [Stmt::Return(ReturnStmt { value: None, .. })]
    ));
}

#[test]
fn test_while_statement() {
    let program = parse("while (a < 4) { ++a; b = b + 4 };");
    assert_eq!(program.statements.len(), 1);
    let Stmt::While(while_stmt) = &program.statements[0] else {
        panic!("expected while");
    };
    assert_eq!(while_stmt.condition.to_string(), "(a < 4)");
    assert_eq!(while_stmt.body.stmts.len(), 2);
    assert_eq!(program.to_string(), "while (a < 4) (++a)b = (b + 4);");
}

#[test]
fn test_semicolons_are_optional() {
    let program = parse("let a = 1\nlet b = 2\na + b");
    assert_eq!(program.statements.len(), 3);
}

// ─────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_operator_precedence() {
    let cases = [
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b + c", "((a + b) + c)"),
        ("a + b - c", "((a + b) - c)"),
        ("a * b * c", "((a * b) * c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b / c", "(a + (b / c))"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
        ("true == !false", "(true == (!false))"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("!(true == true)", "(!(true == true))"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
        ),
        ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
        ("-f(x)", "(-f(x))"),
        ("++a + 1", "((++a) + 1)"),
    ];
    for (source, expected) in cases {
        assert_eq!(parse_expr(source).to_string(), expected, "source: {source}");
    }
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_literals() {
    assert_eq!(parse_expr("5").kind, ExprKind::IntegerLit(5));
    assert_eq!(parse_expr("false").kind, ExprKind::BoolLit(false));
    assert_eq!(
        parse_expr("foobar").kind,
        ExprKind::Identifier("foobar".into())
    );
    assert_eq!(
        parse_expr(r#""hello world""#).kind,
        ExprKind::StringLit("hello world".into())
    );
}

// ─────────────────────────────────────────────────────────────────────
// Compound expressions
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_if_expression() {
    let expr = parse_expr("if (x < y) { x }");
    let ExprKind::If(if_expr) = &expr.kind else {
        panic!("expected if");
    };
    assert_eq!(if_expr.condition.to_string(), "(x < y)");
    assert_eq!(if_expr.consequence.to_string(), "x");
    assert!(if_expr.alternative.is_none());
}

#[test]
fn test_if_else_expression() {
    let expr = parse_expr("if (x < y) { x } else { y }");
    assert_eq!(expr.to_string(), "if (x < y) x else y");
    let ExprKind::If(if_expr) = &expr.kind else {
        panic!("expected if");
    };
    assert_eq!(
        if_expr.alternative.as_ref().map(|alt| alt.to_string()),
        Some("y".to_string())
    );
}

#[test]
fn test_function_literal() {
    let expr = parse_expr("fn(x, y) { x + y; }");
    let ExprKind::Function(func) = &expr.kind else {
        panic!("expected function literal");
    };
    let params: Vec<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, vec!["x", "y"]);
    assert_eq!(func.body.to_string(), "(x + y)");
    assert_eq!(expr.to_string(), "fn(x, y) (x + y)");
}

#[test]
fn test_function_parameter_lists() {
    let cases: [(&str, &[&str]); 3] = [
        ("fn() {};", &[]),
        ("fn(x) {};", &["x"]),
        ("fn(x, y, z) {};", &["x", "y", "z"]),
    ];
    for (source, expected) in cases {
        let ExprKind::Function(func) = parse_expr(source).kind else {
            panic!("expected function literal for {source}");
        };
        let params: Vec<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, expected, "source: {source}");
    }
}

#[test]
fn test_call_expression() {
    let expr = parse_expr("add(1, 2 * 3, 4 + 5);");
    let ExprKind::Call { callee, args } = &expr.kind else {
        panic!("expected call");
    };
    assert_eq!(callee.to_string(), "add");
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    assert_eq!(args, vec!["1", "(2 * 3)", "(4 + 5)"]);
}

#[test]
fn test_immediately_invoked_function() {
    let expr = parse_expr("fn(x) { x; }(5)");
    let ExprKind::Call { callee, args } = &expr.kind else {
        panic!("expected call");
    };
    assert!(matches!(callee.kind, ExprKind::Function(_)));
    assert_eq!(args.len(), 1);
}

#[test]
fn test_chained_calls() {
    assert_eq!(parse_expr("newAdder(2)(3)").to_string(), "newAdder(2)(3)");
}

// ─────────────────────────────────────────────────────────────────────
// Spans
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_spans_cover_whole_construct() {
    let program = parse("let total = 1 + 22;\nwhile (x) {\n  x = 0\n}");
    let let_span = program.statements[0].span();
    assert_eq!((let_span.start_line, let_span.start_col), (1, 1));
    assert_eq!((let_span.end_line, let_span.end_col), (1, 17));

    let while_span = program.statements[1].span();
    assert_eq!((while_span.start_line, while_span.start_col), (2, 1));
    assert_eq!((while_span.end_line, while_span.end_col), (4, 1));
}

// ─────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_program_serializes_to_json() {
    let program = parse("let x = 1;");
    let json = serde_json::to_value(&program).unwrap();
    let stmt = &json["statements"][0]["Let"];
    assert_eq!(stmt["name"]["name"], "x");
    assert_eq!(stmt["value"]["kind"]["IntegerLit"], 1);
    assert_eq!(stmt["span"]["line"], 1);
}

#[test]
fn test_errors_serialize_to_json() {
    let errors = parse_errors("let = 5;");
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json["total_errors"], 1);
    assert_eq!(json["errors"][0]["category"], "syntax");
    assert_eq!(json["errors"][0]["line"], 1);
    assert_eq!(json["errors"][0]["column"], 5);
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_let_missing_identifier() {
    let errors = parse_errors("let = 5;");
    assert_eq!(codes(&errors), vec![ErrorCode::UNEXPECTED_TOKEN]);
    assert_eq!(errors.errors[0].message, "expected identifier, got '='");
}

#[test]
fn test_let_missing_assign() {
    let errors = parse_errors("let x 5;");
    assert_eq!(codes(&errors), vec![ErrorCode::UNEXPECTED_TOKEN]);
    assert_eq!(errors.errors[0].message, "expected '=', got '5'");
}

#[test]
fn test_missing_expression() {
    let errors = parse_errors("let x = ;");
    assert_eq!(codes(&errors), vec![ErrorCode::EXPECTED_EXPRESSION]);
    assert_eq!(errors.errors[0].message, "expected expression, got ';'");
}

#[test]
fn test_increment_requires_identifier() {
    let errors = parse_errors("++5;");
    assert_eq!(codes(&errors), vec![ErrorCode::INVALID_INCREMENT_TARGET]);
}

#[test]
fn test_while_requires_parenthesized_condition() {
    let errors = parse_errors("while true { 1 }");
    assert_eq!(codes(&errors)[0], ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(errors.errors[0].message, "expected '(', got 'true'");
}

#[test]
fn test_unmatched_closing_brace() {
    let errors = parse_errors("let a = 1; }");
    assert_eq!(errors.errors[0].message, "unmatched '}'");
}

#[test]
fn test_recovers_and_reports_multiple_errors() {
    let sf = SourceFile::new("test.monkey", "let = 1;\nlet ok = 2;\nlet x 3;\nok");
    let result = parse_source(&sf);
    assert_eq!(result.errors.total_errors, 2);
    assert_eq!(result.errors.errors[0].span.start_line, 1);
    assert_eq!(result.errors.errors[1].span.start_line, 3);
    let names: Vec<String> = result
        .program
        .statements
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Let(let_stmt) => Some(let_stmt.name.name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["ok".to_string()]);
}

#[test]
fn test_lexer_errors_come_first() {
    let errors = parse_errors("let a = @;");
    assert_eq!(errors.errors[0].code, ErrorCode::ILLEGAL_CHARACTER);
}

#[test]
fn test_nesting_depth_limit() {
    let depth = MAX_EXPR_DEPTH as usize + 10;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let errors = parse_errors(&source);
    assert_eq!(codes(&errors)[0], ErrorCode::NESTING_TOO_DEEP);
}

#[test]
fn test_error_display_includes_location() {
    let errors = parse_errors("let x = ;");
    let rendered = errors.errors[0].to_string();
    assert!(rendered.starts_with("1:9:"), "got {rendered}");
    assert!(rendered.contains("expected expression"), "got {rendered}");
}
