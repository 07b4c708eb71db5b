//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable declarations
//! - Function declarations
//! - Expressions and precedence
//! - Control flow statements

use std::rc::Rc;

use crate::{
    ast::{ast::{Expr, Stmt}, statements::BlockStmt},
    errors::errors::Error,
    lexer::{lexer::tokenize, tokens::TokenKind},
};

use super::parser::parse;

fn parse_source(source: &str) -> Result<BlockStmt, Error> {
    let tokens = tokenize(source.to_string(), Some("test.lang".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.lang".to_string()));
    result
}

fn single_expr(source: &str) -> Expr {
    let block = parse_source(source).unwrap();
    match block.body.into_iter().next() {
        Some(Stmt::Expression(stmt)) => stmt.expression,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let block = parse_source("var x = 42;").unwrap();
    match &block.body[0] {
        Stmt::VarDecl(decl) => {
            assert_eq!(decl.identifier, "x");
            assert!(!decl.is_constant);
            assert!(decl.explicit_type.is_none());
            assert!(matches!(decl.assigned_value, Expr::Number(ref n) if n.value == 42));
        }
        other => panic!("expected var declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_let_declaration_with_type() {
    let block = parse_source("let name: string = \"rdni\";").unwrap();
    match &block.body[0] {
        Stmt::VarDecl(decl) => {
            assert!(decl.is_constant);
            assert_eq!(decl.explicit_type.as_ref().unwrap().name, "string");
        }
        other => panic!("expected let declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_declaration_requires_initialiser() {
    let error = parse_source("var x;").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_function_declaration() {
    let block = parse_source("fn add(a: int, b: int) -> int { return a + b; }").unwrap();
    match &block.body[0] {
        Stmt::FnDecl(decl) => {
            assert_eq!(decl.identifier, "add");
            assert_eq!(decl.parameters.len(), 2);
            assert_eq!(decl.parameters[1].name, "b");
            assert_eq!(decl.return_type.as_ref().unwrap().name, "int");
            assert!(matches!(decl.body.body[0], Stmt::Return(_)));
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_function_without_parameters() {
    let block = parse_source("fn hello() { print(\"hi\"); }").unwrap();
    match &block.body[0] {
        Stmt::FnDecl(decl) => {
            assert!(decl.parameters.is_empty());
            assert!(decl.return_type.is_none());
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_if_else_statement() {
    let block = parse_source("if x > 0 { x = 1; } else { x = 2; }").unwrap();
    match &block.body[0] {
        Stmt::If(stmt) => {
            assert!(matches!(stmt.condition, Expr::Binary(_)));
            assert!(stmt.else_body.is_some());
        }
        other => panic!("expected if statement, got {:?}", other),
    }
}

#[test]
fn test_parse_loops() {
    let block = parse_source(
        "while x < 10 { x = x + 1; } do { x -= 1; } while x > 0; for (var i = 0; i < 3; i += 1) { break; continue; }",
    )
    .unwrap();

    assert!(matches!(block.body[0], Stmt::While(_)));
    assert!(matches!(block.body[1], Stmt::DoWhile(_)));
    match &block.body[2] {
        Stmt::For(stmt) => {
            assert!(matches!(*stmt.initializer, Stmt::VarDecl(_)));
            assert!(matches!(stmt.increment, Expr::Assignment(_)));
        }
        other => panic!("expected for statement, got {:?}", other),
    }
}

#[test]
fn test_parse_precedence() {
    // -5 * 4 - (...) must parse as ((-5) * 4) - (...)
    match single_expr("-5 * 4 - (24 / 2 - (5 + 2*3) + 8)") {
        Expr::Binary(binary) => {
            assert_eq!(binary.operator.kind, TokenKind::Dash);
            match *binary.left {
                Expr::Binary(ref product) => {
                    assert_eq!(product.operator.kind, TokenKind::Star);
                    assert!(matches!(*product.left, Expr::Prefix(_)));
                }
                ref other => panic!("expected product, got {:?}", other),
            }
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_parse_left_associativity() {
    match single_expr("10 - 4 - 3;") {
        Expr::Binary(binary) => {
            assert!(matches!(*binary.left, Expr::Binary(_)));
            assert!(matches!(*binary.right, Expr::Number(ref n) if n.value == 3));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_parse_logical_precedence() {
    // && binds tighter than ||
    match single_expr("a || b && c;") {
        Expr::Binary(binary) => {
            assert_eq!(binary.operator.kind, TokenKind::Or);
            assert!(matches!(*binary.right, Expr::Binary(ref inner) if inner.operator.kind == TokenKind::And));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_parse_assignment_is_right_associative() {
    match single_expr("a = b = 1;") {
        Expr::Assignment(assignment) => {
            assert_eq!(assignment.assignee.value, "a");
            assert!(matches!(*assignment.value, Expr::Assignment(ref inner) if inner.assignee.value == "b"));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_invalid_assignment_target() {
    let error = parse_source("1 + 2 = 3;").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_call_arguments() {
    match single_expr("add(1, 2 * 3, x);") {
        Expr::Call(call) => {
            assert_eq!(call.callee.value, "add");
            assert_eq!(call.arguments.len(), 3);
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn test_parse_boolean_literals() {
    assert!(matches!(single_expr("true"), Expr::Boolean(ref b) if b.value));
    assert!(matches!(single_expr("!false"), Expr::Prefix(_)));
}

#[test]
fn test_final_semicolon_optional() {
    assert!(parse_source("true + 1").is_ok());
    assert!(parse_source("x = 1 y = 2").is_err());
}

#[test]
fn test_parse_missing_semicolon() {
    let error = parse_source("var x = 5 var y = 10;").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_parse_unclosed_block() {
    assert!(parse_source("{ var x = 1;").is_err());
}

#[test]
fn test_parse_number_overflow() {
    let error = parse_source("var x = 99999999999;").unwrap_err();
    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_statement_spans() {
    let block = parse_source("var x = 42;").unwrap();
    let span = block.body[0].get_span();
    assert_eq!(span.start.0, 0);
    assert_eq!(span.end.0, 11);
}
